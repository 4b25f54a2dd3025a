pub mod interpolation;
pub mod parser;
pub mod template;
pub mod value;

pub use interpolation::{Conversion, Interpolation, InvalidConversion};
pub use parser::{ParseError, Parser, Resolver};
pub use template::{Template, TemplatePart};
pub use value::{Thunk, UnhashableValue, Value};
