//! Test-only crate. Everything lives under `tests/`; fixtures are `.xi`
//! programs in `fixtures/`.
