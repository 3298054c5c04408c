use serde::Serialize;

/// One chemical element.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ElementRecord {
    pub symbol: &'static str,
    /// English name.
    pub name: &'static str,
    pub chinese_name: &'static str,
    pub atomic_number: u32,
    pub atomic_weight: f64,
}

impl ElementRecord {
    pub const fn new(
        symbol: &'static str,
        name: &'static str,
        chinese_name: &'static str,
        atomic_number: u32,
        atomic_weight: f64,
    ) -> Self {
        Self { symbol, name, chinese_name, atomic_number, atomic_weight }
    }

    /// Keys under which the record is reachable in a [`crate::Directory`].
    pub fn keys(&self) -> [&'static str; 2] {
        [self.symbol, self.chinese_name]
    }
}
