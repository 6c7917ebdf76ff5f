//! Shared test harness modules for the hoseline CLI.

use super::*;

mod helpers;
