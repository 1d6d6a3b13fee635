pub mod animation;
pub mod common;
pub mod julia;
pub mod newtons_method;
pub mod parameter_path;
