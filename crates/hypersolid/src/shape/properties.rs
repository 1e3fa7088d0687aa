use hypersolid_math::Float;
use indexmap::IndexMap;
use serde::Serialize;

/// Ordered map from property name to value.
pub type Properties = IndexMap<&'static str, PropertyValue>;

/// Value of a shape property.
#[derive(Serialize, Debug, Copy, Clone, PartialEq)]
#[serde(untagged)]
pub enum PropertyValue {
    /// Real-valued measurement such as a length.
    Real(Float),
    /// Exact count such as a number of vertices.
    Count(u128),
    /// Yes/no property.
    Flag(bool),
}
impl PropertyValue {
    /// Returns the value as a float, or `None` if it is not numeric.
    pub fn as_float(self) -> Option<Float> {
        match self {
            PropertyValue::Real(x) => Some(x),
            PropertyValue::Count(n) => Some(n as Float),
            PropertyValue::Flag(_) => None,
        }
    }
}
impl From<Float> for PropertyValue {
    fn from(value: Float) -> Self {
        Self::Real(value)
    }
}
impl From<u128> for PropertyValue {
    fn from(value: u128) -> Self {
        Self::Count(value)
    }
}
impl From<bool> for PropertyValue {
    fn from(value: bool) -> Self {
        Self::Flag(value)
    }
}

/// Inserts a count into `props` if it is known.
pub(super) fn insert_count(props: &mut Properties, name: &'static str, count: Option<u128>) {
    match count {
        Some(n) => {
            props.insert(name, PropertyValue::Count(n));
        }
        None => log::debug!("{name} does not fit in u128; omitting"),
    }
}
