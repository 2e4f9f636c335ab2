pub mod gen_itp;
pub mod library;
pub mod render;
pub mod run;
