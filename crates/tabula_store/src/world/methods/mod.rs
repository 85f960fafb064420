mod access;
mod insert;
mod register;
mod remove;
mod table;
