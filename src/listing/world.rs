//! World catalog browsing state.

use serde::Serialize;

use crate::models::City;

/// The grid and the open detail as a client should show them.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WorldView {
    pub cities: Vec<City>,
    pub selected: Option<City>,
}

/// City grid plus the detail entry currently open, if any.
#[derive(Debug, Clone, Default)]
pub struct CityBrowser {
    cities: Vec<City>,
    selected: Option<City>,
}

impl CityBrowser {
    pub fn new(snapshot: Vec<City>) -> Self {
        let mut browser = Self::default();
        browser.refresh(snapshot);
        browser
    }

    /// Replace the grid with a new snapshot. An open detail whose city
    /// vanished is closed; otherwise it picks up the fresh data.
    pub fn refresh(&mut self, mut snapshot: Vec<City>) {
        snapshot.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
        self.cities = snapshot;

        if let Some(selected) = self.selected.take() {
            self.selected = self.cities.iter().find(|c| c.id == selected.id).cloned();
        }
    }

    pub fn cities(&self) -> &[City] {
        &self.cities
    }

    pub fn selected(&self) -> Option<&City> {
        self.selected.as_ref()
    }

    /// Open the detail of `id`. Returns false when the city is not listed.
    pub fn open(&mut self, id: &str) -> bool {
        self.selected = self.cities.iter().find(|c| c.id == id).cloned();
        self.selected.is_some()
    }

    /// Reflect a saved city in the grid and in the open detail.
    pub fn saved(&mut self, city: City) {
        let mut snapshot: Vec<City> = self
            .cities
            .iter()
            .filter(|c| c.id != city.id)
            .cloned()
            .collect();
        snapshot.push(city);
        self.refresh(snapshot);
    }

    /// Reflect a deleted city: it leaves the grid and its detail closes.
    pub fn deleted(&mut self, id: &str) {
        self.cities.retain(|c| c.id != id);
        if self.selected.as_ref().is_some_and(|c| c.id == id) {
            self.selected = None;
        }
    }

    pub fn into_view(self) -> WorldView {
        WorldView {
            cities: self.cities,
            selected: self.selected,
        }
    }
}
