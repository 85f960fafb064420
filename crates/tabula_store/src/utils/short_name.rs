use alloc::string::String;
use core::fmt::{self, Write};

/// Returns the name of `T` with module paths collapsed.
///
/// This is the default name a component is registered under, so that
/// `table_from_str("Position, Velocity")` can find `my_game::Position`.
///
/// # Examples
///
/// ```
/// use tabula_store::utils::short_type_name;
///
/// assert_eq!(short_type_name::<String>(), "String");
/// assert_eq!(short_type_name::<Option<String>>(), "Option<String>");
/// ```
pub fn short_type_name<T: ?Sized>() -> String {
    let mut out = String::new();
    // Writing to a `String` cannot fail.
    let _ = write_short_name(core::any::type_name::<T>(), &mut out);
    out
}

/// Writes `full_name` with every path segment collapsed to its last part.
///
/// Enum variants keep their enum name: `a::Enum::Variant` becomes
/// `Enum::Variant`. Generic and tuple punctuation is preserved.
#[inline(never)]
pub fn write_short_name(full_name: &str, f: &mut impl Write) -> fmt::Result {
    fn collapse_type_name(name: &str) -> &str {
        let mut segments = name.rsplit("::");
        let Some(last) = segments.next() else {
            return name;
        };

        // As heuristic, we assume the enum type to be uppercase.
        if let Some(second_last) = segments.next()
            && second_last.starts_with(char::is_uppercase)
        {
            let index = name.len() - last.len() - second_last.len() - 2;
            &name[index..]
        } else {
            last
        }
    }

    const SPECIAL_CHARS: [char; 9] = [' ', '<', '>', '(', ')', '[', ']', ',', ';'];

    let mut rest = full_name;

    while !rest.is_empty() {
        if let Some(index) = rest.find(|c| SPECIAL_CHARS.contains(&c)) {
            f.write_str(collapse_type_name(&rest[0..index]))?;
            f.write_str(&rest[index..=index])?;
            rest = &rest[(index + 1)..];
        } else {
            f.write_str(collapse_type_name(rest))?;
            return Ok(());
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::short_type_name;

    #[allow(dead_code, reason = "only the type names are inspected")]
    mod nested {
        pub struct Position;
        pub struct Pair<A, B>(pub A, pub B);
    }

    #[test]
    fn collapses_paths() {
        assert_eq!(short_type_name::<nested::Position>(), "Position");
        assert_eq!(short_type_name::<u32>(), "u32");
    }

    #[test]
    fn collapses_generics() {
        assert_eq!(
            short_type_name::<nested::Pair<nested::Position, (u8, i16)>>(),
            "Pair<Position, (u8, i16)>"
        );
        assert_eq!(short_type_name::<[nested::Position; 2]>(), "[Position; 2]");
    }
}
