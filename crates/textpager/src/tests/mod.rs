mod cache_lru;
mod detect_properties;
