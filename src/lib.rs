pub mod core;
pub mod prelude;

// Lets the crate refer to itself by name, same as downstream users do.
extern crate self as shader_cache;

#[cfg(test)]
mod tests;
