pub mod feature_store;
