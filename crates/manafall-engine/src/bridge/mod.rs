pub mod buffers;
pub mod protocol;
