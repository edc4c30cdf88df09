pub mod clear;
pub mod create;
pub mod help;
pub mod info;
pub mod kill;
pub mod memstats;
pub mod memtest;
pub mod proctest;
pub mod ps;
pub mod schedconf;
pub mod schedstats;
pub mod tick;
