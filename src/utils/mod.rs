pub mod console;
#[cfg(test)]
pub mod test_utils;
