//! Workspace integration tests.

#[cfg(test)]
mod backends;
