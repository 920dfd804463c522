pub mod elasticsearch;

pub use elasticsearch::ElasticsearchIndex;
