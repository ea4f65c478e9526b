use smol_str::{SmolStr, ToSmolStr};

/// Canonical textual form of a value when it is used as a dictionary key.
///
/// Integers render as base-10, booleans as `true`/`false` and floats with the
/// shortest representation that round-trips (`1.0` becomes `1`).
/// [`Value::Nil`](crate::Value::Nil) renders as `nil`, not `<nil>`.
pub trait ToKey {
    fn to_key(&self) -> SmolStr;
}

impl ToKey for str {
    fn to_key(&self) -> SmolStr {
        SmolStr::new(self)
    }
}

impl ToKey for String {
    fn to_key(&self) -> SmolStr {
        SmolStr::new(self)
    }
}

impl ToKey for SmolStr {
    fn to_key(&self) -> SmolStr {
        self.clone()
    }
}

impl ToKey for char {
    fn to_key(&self) -> SmolStr {
        self.to_smolstr()
    }
}

impl ToKey for bool {
    fn to_key(&self) -> SmolStr {
        if *self {
            SmolStr::new_static("true")
        } else {
            SmolStr::new_static("false")
        }
    }
}

macro_rules! display_key {
    ($($t:ty),*) => {
        $(
            impl ToKey for $t {
                fn to_key(&self) -> SmolStr {
                    self.to_smolstr()
                }
            }
        )*
    };
}

display_key!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64);

impl<T: ToKey + ?Sized> ToKey for &T {
    fn to_key(&self) -> SmolStr {
        (**self).to_key()
    }
}
