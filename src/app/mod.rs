mod export;
mod runner;
pub(crate) mod summary;

#[cfg(test)]
mod tests;

pub(crate) use runner::run_local;
