/// Data layer: identifier parsing, loading, grouping and ranking.
///
/// Architecture:
/// ```text
///  json-videos.json / .csv
///        │
///        ▼
///   ┌──────────┐
///   │  loader  │  parse file → Dataset
///   └──────────┘
///        │   (params: identifier → parameters + capture time)
///        ▼
///   ┌──────────┐
///   │ Dataset  │  Vec<VideoRecord>, parameter index
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │ grouping │  bucket → sort → one ranked representative per group
///   └──────────┘
/// ```

pub mod grouping;
pub mod loader;
pub mod model;
pub mod params;
