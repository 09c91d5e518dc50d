//! Org Planner - WASM Module
//!
//! This module provides the view-model core of the Org Planner chart editor.
//! It is compiled to WebAssembly and exposes a JavaScript-friendly API via
//! wasm-bindgen.
//!
//! # Architecture
//!
//! - `graph`: person nodes, reporting edges, the hierarchy index and snapshot edits
//! - `view`: view configuration, visibility/depth resolution and leadership ranks
//! - `layout`: leaf clustering, the layered layout and team frames
//! - `color`: filter colors, contrast text and team accents
//! - `salary`: job families and salary-band propagation
//! - `stats`: headcount, depth and span-of-control figures
//! - `plan`: the persisted plan document
//! - `pipeline`: the pure resolve entry point tying the resolvers together

use serde::Serialize;
use serde::de::DeserializeOwned;
use wasm_bindgen::prelude::*;

pub mod color;
pub mod error;
pub mod graph;
pub mod layout;
pub mod pipeline;
pub mod plan;
pub mod salary;
pub mod stats;
pub mod view;

use error::OrgPlannerError;
use graph::{NodeEdit, OrgSnapshot, Point, new_position_id};
use layout::{DagreLayout, LayoutConfig};
use plan::PlanDocument;
use salary::{BandEdit, JobFamily, SalaryError, find_family, replace_family};
use view::{SessionOptions, ViewState};

/// Initialize the WASM module: browser console logging and panic messages.
#[wasm_bindgen(start)]
pub fn init() {
    if console_log::init_with_level(log::Level::Debug).is_err() {
        log::debug!("console logger already installed");
    }
    console_error_panic_hook::set_once();
}

fn to_js<T: Serialize>(value: &T) -> Result<JsValue, OrgPlannerError> {
    Ok(serde_wasm_bindgen::to_value(value)?)
}

fn from_js<T: DeserializeOwned>(value: JsValue) -> Result<T, OrgPlannerError> {
    Ok(serde_wasm_bindgen::from_value(value)?)
}

/// Main entry point for the chart editor core.
///
/// Holds the open plan: the current snapshot, its view configuration, the
/// transient session options and the job families. Every edit replaces the
/// held value with the next immutable version.
#[wasm_bindgen]
pub struct OrgPlannerWasm {
    name: String,
    snapshot: OrgSnapshot,
    view: ViewState,
    session: SessionOptions,
    config: LayoutConfig,
    families: Vec<JobFamily>,
}

#[wasm_bindgen]
impl OrgPlannerWasm {
    /// Create an empty, unnamed plan.
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self {
            name: String::new(),
            snapshot: OrgSnapshot::default(),
            view: ViewState::default(),
            session: SessionOptions::default(),
            config: LayoutConfig::default(),
            families: Vec::new(),
        }
    }

    // =========================================================================
    // Plan Documents
    // =========================================================================

    /// Replace the open plan with a JSON plan document.
    #[wasm_bindgen(js_name = loadPlan)]
    pub fn load_plan(&mut self, json: &str) -> Result<(), OrgPlannerError> {
        let doc = PlanDocument::from_json(json)?;
        self.snapshot = doc.snapshot();
        self.name = doc.name;
        self.view = doc.view_state;
        self.families = doc.job_families;
        Ok(())
    }

    /// Serialize the open plan, stamped with the current time.
    #[wasm_bindgen(js_name = savePlan)]
    pub fn save_plan(&self) -> Result<String, OrgPlannerError> {
        let now = String::from(js_sys::Date::new_0().to_iso_string());
        let doc = PlanDocument::new(&self.name, &self.snapshot, &self.view, &self.families, now);
        Ok(doc.to_json()?)
    }

    #[wasm_bindgen(getter)]
    pub fn name(&self) -> String {
        self.name.clone()
    }

    #[wasm_bindgen(setter)]
    pub fn set_name(&mut self, name: String) {
        self.name = name;
    }

    // =========================================================================
    // Snapshot and Configuration
    // =========================================================================

    /// Current `{ nodes, edges }`.
    #[wasm_bindgen(js_name = getSnapshot)]
    pub fn get_snapshot(&self) -> Result<JsValue, OrgPlannerError> {
        to_js(&self.snapshot)
    }

    /// Replace the nodes and edges, e.g. after a CSV import.
    #[wasm_bindgen(js_name = setSnapshot)]
    pub fn set_snapshot(&mut self, snapshot: JsValue) -> Result<(), OrgPlannerError> {
        self.snapshot = from_js(snapshot)?;
        Ok(())
    }

    #[wasm_bindgen(js_name = getViewState)]
    pub fn get_view_state(&self) -> Result<JsValue, OrgPlannerError> {
        to_js(&self.view)
    }

    #[wasm_bindgen(js_name = setViewState)]
    pub fn set_view_state(&mut self, view: JsValue) -> Result<(), OrgPlannerError> {
        self.view = from_js(view)?;
        Ok(())
    }

    #[wasm_bindgen(js_name = setLayoutConfig)]
    pub fn set_layout_config(&mut self, config: JsValue) -> Result<(), OrgPlannerError> {
        self.config = from_js(config)?;
        Ok(())
    }

    #[wasm_bindgen(js_name = setRecruiterMode)]
    pub fn set_recruiter_mode(&mut self, enabled: bool) {
        self.session.recruiter_mode = enabled;
    }

    #[wasm_bindgen(js_name = setSearchQuery)]
    pub fn set_search_query(&mut self, query: String) {
        self.session.search_query = query;
    }

    // =========================================================================
    // Resolve
    // =========================================================================

    /// Resolve the open plan into a renderable chart.
    pub fn resolve(&self) -> Result<JsValue, OrgPlannerError> {
        to_js(&pipeline::resolve(
            &self.snapshot,
            &self.view,
            &self.session,
            &self.config,
            &DagreLayout,
        ))
    }

    /// Toggle a node's collapse state.
    ///
    /// Returns `{ viewState, before, after }` where `before`/`after` are the
    /// node's positions around the toggle, for keeping it still on screen.
    #[wasm_bindgen(js_name = toggleCollapse)]
    pub fn toggle_collapse(&mut self, id: &str) -> Result<JsValue, OrgPlannerError> {
        let transition = pipeline::toggle_collapse_transition(
            &self.snapshot,
            &self.view,
            &self.session,
            &self.config,
            &DagreLayout,
            id,
        )?;
        self.view = transition.view_state.clone();
        to_js(&transition)
    }

    /// Headcount, depth, span of control and filter group coverage.
    pub fn stats(&self) -> Result<JsValue, OrgPlannerError> {
        let index = self.snapshot.index();
        let slot_nodes = index.slot_nodes(&self.snapshot.nodes);
        to_js(&stats::org_stats(&index, &slot_nodes, &self.view.filter_groups))
    }

    // =========================================================================
    // Node Operations
    // =========================================================================

    /// Apply a partial node edit.
    #[wasm_bindgen(js_name = editNode)]
    pub fn edit_node(&mut self, id: &str, edit: JsValue) -> Result<(), OrgPlannerError> {
        let edit: NodeEdit = from_js(edit)?;
        self.snapshot = self.snapshot.edit_node(id, &edit)?;
        Ok(())
    }

    /// Add a vacancy reporting to `parent_id`.
    ///
    /// Returns the new node id.
    #[wasm_bindgen(js_name = addSubordinate)]
    pub fn add_subordinate(&mut self, parent_id: &str) -> Result<String, OrgPlannerError> {
        let id = self.fresh_position_id();
        self.snapshot = self.snapshot.add_subordinate(parent_id, &id)?;
        Ok(id)
    }

    /// Delete a node with its reporting lines.
    #[wasm_bindgen(js_name = deleteNode)]
    pub fn delete_node(&mut self, id: &str) -> Result<(), OrgPlannerError> {
        self.snapshot = self.snapshot.delete_node(id)?;
        self.view = self
            .view
            .retain_nodes(self.snapshot.nodes.iter().map(|n| n.id.as_str()));
        Ok(())
    }

    /// Point an existing reporting line at a new manager.
    #[wasm_bindgen(js_name = reconnectEdge)]
    pub fn reconnect_edge(&mut self, edge_id: &str, new_source: &str) -> Result<(), OrgPlannerError> {
        self.snapshot = self.snapshot.reconnect_edge(edge_id, new_source)?;
        Ok(())
    }

    /// Make `source` the only manager of `target`.
    pub fn connect(&mut self, source: &str, target: &str) -> Result<(), OrgPlannerError> {
        self.snapshot = self.snapshot.connect(source, target)?;
        Ok(())
    }

    /// Store a dragged node's position.
    #[wasm_bindgen(js_name = moveNode)]
    pub fn move_node(&mut self, id: &str, x: f64, y: f64) {
        self.snapshot = self.snapshot.move_node(id, Point::new(x, y));
    }

    #[wasm_bindgen(js_name = nodeCount)]
    pub fn node_count(&self) -> usize {
        self.snapshot.nodes.len()
    }

    // =========================================================================
    // Salary Bands
    // =========================================================================

    #[wasm_bindgen(js_name = getJobFamilies)]
    pub fn get_job_families(&self) -> Result<JsValue, OrgPlannerError> {
        to_js(&self.families)
    }

    #[wasm_bindgen(js_name = addJobFamily)]
    pub fn add_job_family(&mut self, id: &str, name: &str) -> Result<(), OrgPlannerError> {
        self.families = salary::add_family(&self.families, id, name)?;
        Ok(())
    }

    #[wasm_bindgen(js_name = removeJobFamily)]
    pub fn remove_job_family(&mut self, id: &str) -> Result<(), OrgPlannerError> {
        self.families = salary::remove_family(&self.families, id)?;
        Ok(())
    }

    /// Add a band, optionally one level above `parent_id`.
    #[wasm_bindgen(js_name = addSalaryBand)]
    pub fn add_salary_band(
        &mut self,
        family_id: &str,
        band_id: &str,
        name: &str,
        parent_id: Option<String>,
    ) -> Result<(), OrgPlannerError> {
        self.update_family(family_id, |f| f.add_band(band_id, name, parent_id.as_deref()))
    }

    #[wasm_bindgen(js_name = updateSalaryBand)]
    pub fn update_salary_band(
        &mut self,
        family_id: &str,
        band_id: &str,
        edit: JsValue,
    ) -> Result<(), OrgPlannerError> {
        let edit: BandEdit = from_js(edit)?;
        self.update_family(family_id, |f| f.update_band(band_id, &edit))
    }

    #[wasm_bindgen(js_name = toggleBandAuto)]
    pub fn toggle_band_auto(&mut self, family_id: &str, band_id: &str) -> Result<(), OrgPlannerError> {
        self.update_family(family_id, |f| f.toggle_auto(band_id))
    }

    #[wasm_bindgen(js_name = setLeadingBand)]
    pub fn set_leading_band(&mut self, family_id: &str, band_id: &str) -> Result<(), OrgPlannerError> {
        self.update_family(family_id, |f| f.set_leading(band_id))
    }

    #[wasm_bindgen(js_name = removeSalaryBand)]
    pub fn remove_salary_band(&mut self, family_id: &str, band_id: &str) -> Result<(), OrgPlannerError> {
        self.update_family(family_id, |f| f.remove_band(band_id))
    }
}

impl OrgPlannerWasm {
    fn update_family(
        &mut self,
        family_id: &str,
        edit: impl FnOnce(&JobFamily) -> Result<JobFamily, SalaryError>,
    ) -> Result<(), OrgPlannerError> {
        let family = find_family(&self.families, family_id)
            .ok_or_else(|| SalaryError::UnknownFamily(family_id.to_string()))?;
        let next = edit(family)?;
        self.families = replace_family(&self.families, next)?;
        Ok(())
    }

    /// A timestamp id not yet used in the snapshot.
    fn fresh_position_id(&self) -> String {
        let base = new_position_id(js_sys::Date::now());
        let mut id = base.clone();
        let mut n = 1;
        while self.snapshot.node(&id).is_some() {
            id = format!("{base}-{n}");
            n += 1;
        }
        id
    }
}

impl Default for OrgPlannerWasm {
    fn default() -> Self {
        Self::new()
    }
}

/// The four sub-bands of a salary band, lowest first.
#[wasm_bindgen(js_name = subBands)]
pub fn sub_bands(midpoint: f64, spread: f64) -> Result<JsValue, OrgPlannerError> {
    to_js(&salary::sub_bands(midpoint, spread))
}

/// Black or white text color for a card background.
#[wasm_bindgen(js_name = contrastTextColor)]
pub fn contrast_text_color(background: &str) -> String {
    color::contrast_text_color(background).to_string()
}
