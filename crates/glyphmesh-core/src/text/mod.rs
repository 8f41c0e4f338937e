mod font;
mod layout;
mod shaping;

pub use self::font::*;
pub use self::layout::*;
pub use self::shaping::*;
