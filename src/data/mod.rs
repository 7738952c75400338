/// Data layer: core types, web sources, alignment and scaling.
///
/// Architecture:
/// ```text
///  World Bank REST (countries / GDP / climate)
///        │
///        ▼
///   ┌──────────┐
///   │   api     │  fetch + parse JSON → Series / Vec<Country>
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  align    │  value domains, year lookup, tooltip pairing
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  scale    │  NumericDomain → pixel mapping
///   └──────────┘
/// ```

pub mod align;
pub mod api;
pub mod model;
pub mod scale;
