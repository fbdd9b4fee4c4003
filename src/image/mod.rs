pub mod io;
pub mod u8;

mod frame;

pub use self::frame::Frame;
pub use self::u8::ImageU8;
