//! End-to-end tests: a real Nubo server on an ephemeral port, driven
//! through the same client stack the CLI uses.

mod helpers;

mod auth_test;
mod drive_test;
mod trash_test;
mod usage_test;
