use std::collections::HashSet;

use crate::interfaces::{Holder, Trade, Trader};

/// Records that carry a wallet address.
pub trait AddressBearing {
    fn address(&self) -> &str;
}

impl AddressBearing for Trade {
    fn address(&self) -> &str {
        &self.maker
    }
}

impl AddressBearing for Trader {
    fn address(&self) -> &str {
        &self.address
    }
}

impl AddressBearing for Holder {
    fn address(&self) -> &str {
        &self.address
    }
}

/// Distinct addresses in first-seen order.
pub fn unique_addresses<'a, T, I>(records: I) -> Vec<String>
where
    T: AddressBearing + 'a,
    I: IntoIterator<Item = &'a T>,
{
    let mut seen = HashSet::new();
    records
        .into_iter()
        .map(AddressBearing::address)
        .filter(|address| !address.is_empty() && seen.insert(*address))
        .map(str::to_string)
        .collect()
}
