mod dict;
mod key;
mod value;

pub use dict::Dict;
pub use key::ToKey;
pub use smol_str::SmolStr;
pub use value::Value;

/// Ordered sequence used for bulk input and for enumeration results.
pub type List<T = Value> = Vec<T>;
