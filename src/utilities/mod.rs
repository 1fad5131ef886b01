pub mod backend;
pub mod selection;
pub mod shutdown;

#[cfg(test)]
pub(crate) mod testing;
