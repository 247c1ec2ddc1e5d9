pub mod series_batch;
