use crate::cache::{RateCache, SelectedCurrency};

#[derive(Clone)]
pub struct AppState {
    pub cache: RateCache,
    pub selected: SelectedCurrency,
}
