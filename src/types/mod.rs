//! BinON value types.

mod convert;
mod dict;
mod int;
mod object;
mod strict;

pub use dict::Dict;
pub use int::{IntVal, UIntVal};
pub use object::Object;
pub use strict::{StrictDict, StrictKeyDict, StrictList};
