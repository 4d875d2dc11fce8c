pub mod impl_fake;
pub mod impl_fs_http;
pub mod interface;
