//! Entry point for the per-component tests under `tests/unit/`.

mod unit;
