use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::alloc::Layout;
use core::cell::RefCell;
use core::mem::ManuallyDrop;

use tabula_ptr::{Ptr, PtrMut};

use crate::component::{
    Component, ComponentDescriptor, ComponentHooks, ComponentId, Dropper, RegisterError,
};
use crate::entity::Record;
use crate::storage::{Column, TableError, TableId, TableRow};
use crate::world::{MoveError, World};

extern crate std;

#[derive(Clone, Copy, Debug, PartialEq)]
struct Position {
    x: f32,
    y: f32,
}
unsafe impl Component for Position {
    const HOOKS: ComponentHooks = ComponentHooks::of::<Self>().with_copy::<Self>();
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct Velocity {
    x: f32,
    y: f32,
}
unsafe impl Component for Velocity {}

#[derive(Default, Clone, Debug, PartialEq)]
struct Label(String);
unsafe impl Component for Label {
    const HOOKS: ComponentHooks = ComponentHooks::of::<Self>()
        .with_default::<Self>()
        .with_clone::<Self>();
}

std::thread_local! {
    static DROPPED: RefCell<Vec<u32>> = const { RefCell::new(Vec::new()) };
}

#[derive(Default)]
struct Tracked(u32);
unsafe impl Component for Tracked {
    const HOOKS: ComponentHooks = ComponentHooks::of::<Self>().with_default::<Self>();
}

impl Drop for Tracked {
    fn drop(&mut self) {
        DROPPED.with(|d| d.borrow_mut().push(self.0));
    }
}

fn dropped() -> Vec<u32> {
    DROPPED.with(|d| d.borrow().clone())
}

fn reset_dropped() {
    DROPPED.with(|d| d.borrow_mut().clear());
}

fn read<T: Copy>(world: &World, record: Record, component: ComponentId) -> T {
    let col = world.find_column(record.table, component).unwrap();
    let column = world.get_column(record.table, col).unwrap();
    unsafe { *column.get(record.row.index()).unwrap().as_ref::<T>() }
}

#[test]
fn position_velocity_scenario() {
    let mut world = World::new();
    let pos = world.register_component::<Position>();
    let vel = world.register_component::<Velocity>();

    let table = world.table_from_ids([pos, vel]).unwrap();
    assert_eq!(world.table_from_ids([vel, pos]).unwrap(), table);

    let e1 = world.spawn_id();
    let e2 = world.spawn_id();
    assert_eq!(
        world.insert(table, Some(e1)),
        Record::new(table, TableRow(0))
    );
    assert_eq!(
        world.insert(table, Some(e2)),
        Record::new(table, TableRow(1))
    );

    assert_eq!(world.remove(table, TableRow(0)), Some(e1));
    assert_eq!(world.count(table), 1);
    let record = world.find_record(e2).unwrap();
    assert_eq!(record, Record::new(table, TableRow(0)));
    assert_eq!(world.find_record(e1), None);
    assert!(world.is_alive(e1));

    let col = world.find_column(table, pos).unwrap();
    let value = [Position { x: 1.0, y: 2.0 }];
    unsafe {
        world.copy_to(
            record,
            col,
            size_of::<Position>(),
            Ptr::from_ref(&value[..]),
            1,
        );
    }
    assert_eq!(
        read::<Position>(&world, record, pos),
        Position { x: 1.0, y: 2.0 }
    );
    assert_eq!(
        read::<Velocity>(&world, record, vel),
        Velocity { x: 0.0, y: 0.0 }
    );
}

#[test]
fn swap_remove_updates_moved_record_only() {
    let mut world = World::new();
    let pos = world.register_component::<Position>();
    let table = world.table_from_ids([pos]).unwrap();

    let entities: Vec<_> = (0..3).map(|_| world.spawn(table)).collect();
    assert_eq!(world.count(table), 3);

    world.remove(table, TableRow(1));
    assert_eq!(world.count(table), 2);
    assert_eq!(
        world.find_record(entities[0]),
        Some(Record::new(table, TableRow(0)))
    );
    assert_eq!(
        world.find_record(entities[2]),
        Some(Record::new(table, TableRow(1)))
    );
    assert_eq!(
        world.table(table).unwrap().entities(),
        [Some(entities[0]), Some(entities[2])]
    );

    world.remove(table, TableRow(1));
    assert_eq!(
        world.find_record(entities[0]),
        Some(Record::new(table, TableRow(0)))
    );
    assert_eq!(world.find_record(entities[2]), None);
}

#[test]
fn detached_rows_are_untracked() {
    let mut world = World::new();
    let pos = world.register_component::<Position>();
    let table = world.table_from_ids([pos]).unwrap();

    let tracked = world.spawn(table);
    let detached = world.insert(table, None);
    assert_eq!(detached.row, TableRow(1));

    assert_eq!(world.remove(table, TableRow(0)), Some(tracked));
    assert_eq!(world.table(table).unwrap().entities(), [None]);
    assert_eq!(world.remove(table, TableRow(0)), None);
    assert_eq!(world.count(table), 0);
}

#[test]
fn rows_survive_growth() {
    let mut world = World::new();
    let pos = world.register_component::<Position>();
    let label = world.register_component::<Label>();
    let table = world.table_from_ids([pos, label]).unwrap();
    let col = world.find_column(table, pos).unwrap();

    let mut records = Vec::new();
    for i in 0..100 {
        let entity = world.spawn(table);
        let record = world.find_record(entity).unwrap();
        let value = [Position { x: i as f32, y: -(i as f32) }];
        unsafe {
            world.copy_pod_to(
                record,
                col,
                size_of::<Position>(),
                Ptr::from_ref(&value[..]),
                1,
            );
        }
        records.push((entity, i));
    }

    assert_eq!(world.table(table).unwrap().capacity(), 128);
    for (entity, i) in records {
        let record = world.find_record(entity).unwrap();
        assert_eq!(
            read::<Position>(&world, record, pos),
            Position { x: i as f32, y: -(i as f32) }
        );
    }

    let col = world.find_column(table, label).unwrap();
    let labels = unsafe { world.get_column(table, col).unwrap().as_slice::<Label>() };
    assert!(labels.iter().all(|l| l.0.is_empty()));
}

#[test]
fn find_column_is_idempotent() {
    let mut world = World::new();
    let pos = world.register_component::<Position>();
    let vel = world.register_component::<Velocity>();
    let table = world.table_from_ids([pos]).unwrap();
    world.spawn(table);

    for _ in 0..3 {
        assert_eq!(world.find_column(table, vel), None);
        assert!(world.find_column(table, pos).is_some());
    }
    assert_eq!(world.count(table), 1);
    assert_eq!(world.find_column(TableId::EMPTY, pos), None);
}

#[test]
fn table_from_str_resolves_names() {
    let mut world = World::new();
    world.register_component::<Position>();
    world.register_component::<Velocity>();

    let a = world.table_from_str("Position, Velocity").unwrap();
    let b = world.table_from_str(" Velocity ,Position").unwrap();
    assert_eq!(a, b);
    assert_eq!(world.table_from_str("").unwrap(), TableId::EMPTY);
    let single = world.table_from_str("Position").unwrap();
    assert_eq!(world.table_from_str("Position,Position").unwrap(), single);

    assert_eq!(
        world.table_from_str("Position, Mass"),
        Err(TableError::UnknownName("Mass".to_string()))
    );
    assert_eq!(
        world.table_from_str("Position,,Velocity"),
        Err(TableError::EmptyName { index: 1 })
    );
    assert_eq!(world.tables.len(), 3);
}

#[test]
fn delete_column_destroys_in_row_order() {
    let mut world = World::new();
    let tracked = world.register_component::<Tracked>();
    let table = world.table_from_ids([tracked]).unwrap();
    let col = world.find_column(table, tracked).unwrap();

    let mut replacement = Column::for_component(world.components.get(tracked).unwrap());
    for i in 0..4u32 {
        let record = world.insert(table, None);
        let mut value = ManuallyDrop::new(Tracked(10 + i));
        unsafe {
            world.move_to(
                record,
                col,
                size_of::<Tracked>(),
                PtrMut::from_mut(&mut *value),
                1,
            );
        }
        replacement.push_default();
    }

    reset_dropped();
    let old = unsafe { world.set_column(table, col, replacement) };
    assert!(dropped().is_empty());

    world.delete_column(table, col, old);
    assert_eq!(dropped(), [10, 11, 12, 13]);

    reset_dropped();
    drop(world);
    assert_eq!(dropped(), [0, 0, 0, 0]);
}

#[test]
fn move_to_then_reinitialize_source() {
    let mut world = World::new();
    let tracked = world.register_component::<Tracked>();
    let table = world.table_from_ids([tracked]).unwrap();
    let col = world.find_column(table, tracked).unwrap();
    let entity = world.spawn(table);
    let record = world.find_record(entity).unwrap();

    reset_dropped();
    let mut buffer = ManuallyDrop::new(Tracked(1));
    unsafe {
        world.move_to(
            record,
            col,
            size_of::<Tracked>(),
            PtrMut::from_mut(&mut *buffer),
            1,
        );
        core::ptr::write(&mut *buffer, Tracked(2));
    }
    // Only the default value the row held was destroyed.
    assert_eq!(dropped(), [0]);

    ManuallyDrop::into_inner(buffer);
    world.despawn(entity).unwrap();
    assert_eq!(dropped(), [0, 2, 1]);
}

#[test]
fn copy_to_clones_owned_values() {
    let mut world = World::new();
    let label = world.register_component::<Label>();
    let table = world.table_from_ids([label]).unwrap();
    let col = world.find_column(table, label).unwrap();

    let first = world.spawn(table);
    world.spawn(table);
    let record = world.find_record(first).unwrap();

    let source = [Label("a".into()), Label("b".into())];
    unsafe {
        world.copy_to(
            record,
            col,
            size_of::<Label>(),
            Ptr::from_ref(&source[..]),
            2,
        );
    }

    let labels = unsafe { world.get_column(table, col).unwrap().as_slice::<Label>() };
    assert_eq!(labels, source);
}

#[test]
fn despawn_frees_row_and_entity() {
    let mut world = World::new();
    let tracked = world.register_component::<Tracked>();
    let table = world.table_from_ids([tracked]).unwrap();

    let a = world.spawn(table);
    let b = world.spawn(table);
    let ptr = world.find_record_ptr(b).unwrap();

    reset_dropped();
    world.despawn(a).unwrap();
    assert_eq!(dropped(), [0]);
    assert!(!world.is_alive(a));
    assert!(world.despawn(a).is_err());
    assert_eq!(world.count(table), 1);

    // The cached record pointer observes the swap-remove.
    assert_eq!(unsafe { ptr.read() }, Record::new(table, TableRow(0)));
}

#[test]
fn move_entity_between_tables() {
    let mut world = World::new();
    let pos = world.register_component::<Position>();
    let vel = world.register_component::<Velocity>();
    let tracked = world.register_component::<Tracked>();

    let src = world.table_from_ids([pos, tracked]).unwrap();
    let dst = world.table_from_ids([pos, vel]).unwrap();

    let a = world.spawn(src);
    let b = world.spawn(src);
    let record = world.find_record(a).unwrap();
    let col = world.find_column(src, pos).unwrap();
    let value = [Position { x: 5.0, y: 6.0 }];
    unsafe {
        world.copy_to(
            record,
            col,
            size_of::<Position>(),
            Ptr::from_ref(&value[..]),
            1,
        );
    }

    reset_dropped();
    let moved = world.move_entity(a, dst).unwrap();
    assert_eq!(moved, Record::new(dst, TableRow(0)));
    assert_eq!(dropped(), [0]);

    assert_eq!(world.find_record(a), Some(moved));
    assert_eq!(world.find_record(b), Some(Record::new(src, TableRow(0))));
    assert_eq!(
        read::<Position>(&world, moved, pos),
        Position { x: 5.0, y: 6.0 }
    );
    assert_eq!(
        read::<Velocity>(&world, moved, vel),
        Velocity { x: 0.0, y: 0.0 }
    );

    let stale = world.spawn_id();
    let result = world.move_entity(stale, dst);
    assert!(matches!(result, Err(MoveError::Entity(_))));
}

unsafe fn drop_tracked(ptr: PtrMut<'_>, count: usize) {
    let slice = core::ptr::slice_from_raw_parts_mut(ptr.as_ptr().cast::<Tracked>(), count);
    unsafe { core::ptr::drop_in_place(slice) };
}

#[test]
fn runtime_component_without_move_hook() {
    let mut world = World::new();
    let hooks = ComponentHooks {
        dropper: Some(unsafe { Dropper::from_raw(drop_tracked) }),
        ..ComponentHooks::EMPTY
    };
    let descriptor =
        unsafe { ComponentDescriptor::new_raw("RawTracked", Layout::new::<Tracked>(), hooks) };
    let raw = world.register_raw_component(descriptor.clone()).unwrap();
    assert_eq!(
        world.register_raw_component(descriptor),
        Err(RegisterError::DuplicateName("RawTracked".to_string()))
    );

    let table = world.table_from_str("RawTracked").unwrap();
    let entities: Vec<_> = (0..3).map(|_| world.spawn(table)).collect();

    let col = world.find_column(table, raw).unwrap();
    let column = world.table_mut(table).unwrap().get_column_mut(col).unwrap();
    let values = unsafe { column.as_mut_slice::<Tracked>() };
    for (i, value) in values.iter_mut().enumerate() {
        *value = Tracked(10 + i as u32);
    }

    reset_dropped();
    assert_eq!(world.remove(table, TableRow(0)), Some(entities[0]));
    assert_eq!(dropped(), [10]);
    assert_eq!(
        world.find_record(entities[2]),
        Some(Record::new(table, TableRow(0)))
    );

    let values = unsafe { world.get_column(table, col).unwrap().as_slice::<Tracked>() };
    let ids: Vec<u32> = values.iter().map(|t| t.0).collect();
    assert_eq!(ids, [12, 11]);

    drop(world);
    assert_eq!(dropped(), [10, 12, 11]);
}
