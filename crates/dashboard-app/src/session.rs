use std::sync::Arc;

use dashboard_config::{CorrelationStrategy, DashboardConfig};
use dashboard_correlation::{ClickTarget, CorrelationIndex, RowSelector, SelectionOutcome, ViewState};
use dashboard_domain::{
    filter_rows, rows_from_records, ChartFeeds, ComplaintId, ComplaintRow, GeoPoint, RowPosition,
    StatusLabel,
};
use dashboard_mutation::{
    HttpMutationTransport, HttpTransportConfig, MutationOutcome, MutationPerfSnapshot,
    MutationTransport, StatusMutationController, Toast, ToastChannel, ToastTiming,
};
use serde::Serialize;
use tracing::{debug, info};

use crate::error::{AppError, AppResult};
use crate::page::{HeadlessPage, PageSnapshot, PageView};

/// Everything one dashboard page needs, wired together.
///
/// The session owns the only [`ViewState`]; the table and the map see it
/// only through the selector calls made here.
pub struct DashboardSession {
    config: DashboardConfig,
    rows: Vec<ComplaintRow>,
    charts: ChartFeeds,
    page: HeadlessPage,
    selector: RowSelector,
    view: ViewState,
    controller: StatusMutationController,
    toasts: ToastChannel,
}

#[derive(Debug, Clone, Serialize)]
pub struct SessionReport {
    pub view_state: ViewState,
    pub page: PageView,
    pub toasts: Vec<Toast>,
    pub mutations: MutationPerfSnapshot,
    pub charts: ChartFeeds,
}

impl DashboardSession {
    /// Builds a session that posts status changes over HTTP.
    pub fn connect(config: DashboardConfig, snapshot: PageSnapshot) -> AppResult<Self> {
        let runtime = config.mutation_runtime();
        let transport = HttpMutationTransport::new(HttpTransportConfig {
            base_url: runtime.base_url,
            request_timeout: runtime.request_timeout,
        })?;
        Ok(Self::with_transport(config, snapshot, Arc::new(transport)))
    }

    pub fn with_transport(
        config: DashboardConfig,
        snapshot: PageSnapshot,
        transport: Arc<dyn MutationTransport>,
    ) -> Self {
        let map = config.map_view();
        let center = GeoPoint::new(map.default_center.0, map.default_center.1);
        let rows = rows_from_records(snapshot.rows);

        let index = match map.correlation {
            CorrelationStrategy::Identifier => CorrelationIndex::from_join(&rows, &snapshot.markers),
            CorrelationStrategy::Positional => CorrelationIndex::build(&rows, &snapshot.markers),
        };
        info!(
            rows = rows.len(),
            markers = snapshot.markers.len(),
            correlated = index.len(),
            strategy = ?map.correlation,
            "dashboard page initialized"
        );

        let page = HeadlessPage::new(&rows, center, map.default_zoom);
        let timing = config.notification_timing();
        let toasts = ToastChannel::new(ToastTiming {
            display: timing.display,
            fade: timing.fade,
        });
        let controller = StatusMutationController::new(
            transport,
            Arc::new(page.clone()),
            Arc::new(toasts.clone()),
        );

        Self {
            selector: RowSelector::new(index, map.focus_zoom, map.narrow_viewport_px),
            view: ViewState::new(center, map.default_zoom),
            config,
            rows,
            charts: snapshot.charts,
            page,
            controller,
            toasts,
        }
    }

    pub fn select_row(&mut self, position: RowPosition) -> SelectionOutcome {
        let mut map = self.page.clone();
        let mut table = self.page.clone();
        self.selector
            .select_for_row(&mut self.view, position, &mut map, &mut table)
    }

    pub fn select_row_by_id(&mut self, row_id: &ComplaintId) -> AppResult<SelectionOutcome> {
        let position = self
            .rows
            .iter()
            .find(|row| &row.id == row_id)
            .map(|row| row.position)
            .ok_or_else(|| AppError::UnknownRow(row_id.to_string()))?;
        Ok(self.select_row(position))
    }

    /// A click anywhere in a row, identified by the originating element's
    /// tag name.
    pub fn click_row(&mut self, position: RowPosition, target_tag: &str) -> SelectionOutcome {
        let target = ClickTarget::from_tag_name(target_tag);
        let mut map = self.page.clone();
        let mut table = self.page.clone();
        self.selector
            .handle_row_click(&mut self.view, position, &target, &mut map, &mut table)
    }

    /// Applies the free-text filter and returns how many rows remain visible.
    pub fn apply_filter(&self, query: &str) -> usize {
        let visibility = filter_rows(&self.rows, query);
        self.page.apply_visibility(&visibility);
        let visible = visibility.iter().filter(|row| row.visible).count();
        debug!(query, visible, total = self.rows.len(), "row filter applied");
        visible
    }

    /// Picks `status` in the row's selector and submits it.
    pub async fn change_status(&self, row_id: &ComplaintId, status: StatusLabel) -> MutationOutcome {
        self.page.choose_status(row_id, &status);
        self.controller.change_status(row_id, status).await
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    pub fn index(&self) -> &CorrelationIndex {
        self.selector.index()
    }

    pub fn view_state(&self) -> &ViewState {
        &self.view
    }

    pub fn page(&self) -> &HeadlessPage {
        &self.page
    }

    pub fn controller(&self) -> &StatusMutationController {
        &self.controller
    }

    pub fn toasts(&self) -> &ToastChannel {
        &self.toasts
    }

    pub fn report(&self) -> SessionReport {
        SessionReport {
            view_state: self.view.clone(),
            page: self.page.view(),
            toasts: self.toasts.active(),
            mutations: self.controller.perf_snapshot(),
            charts: self.charts.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use dashboard_config::{CorrelationStrategy, DashboardConfig};
    use dashboard_correlation::SelectionOutcome;
    use dashboard_domain::{ComplaintId, GeoPoint, MarkerId, RowPosition, StatusLabel};
    use dashboard_mutation::{
        MutationOutcome, MutationRequest, MutationResult, MutationTransport, Severity,
        TransportResponse,
    };

    use super::DashboardSession;
    use crate::error::AppError;
    use crate::page::parse_page_snapshot;

    const PAGE: &str = r#"{
        "rows": [
            {"id": 1, "status": "Pending", "cells": ["1", "Noise", "Gulshan"], "action": "/update_status/1"},
            {"id": 2, "status": "Pending", "cells": ["2", "Flood", "Mirpur"], "action": "/update_status/2"},
            {"id": 3, "status": "Resolved", "cells": ["3", "Garbage", "Uttara"], "action": "/update_status/3"}
        ],
        "markers": [
            {"id": 1, "lat": 23.7925, "lng": 90.4078, "type": "Noise", "location": "Gulshan"},
            {"id": 3, "lat": 23.8759, "lng": 90.3795, "type": "Garbage", "location": "Uttara"}
        ]
    }"#;

    #[derive(Default)]
    struct CannedTransport {
        requests: Mutex<Vec<MutationRequest>>,
    }

    #[async_trait]
    impl MutationTransport for CannedTransport {
        async fn submit(&self, request: &MutationRequest) -> MutationResult<TransportResponse> {
            self.requests
                .lock()
                .expect("requests lock")
                .push(request.clone());
            Ok(TransportResponse {
                status: 200,
                body: r#"{"status":"success","message":"Updated"}"#.to_owned(),
            })
        }
    }

    fn session_with(config: DashboardConfig) -> DashboardSession {
        let snapshot = parse_page_snapshot(PAGE).expect("parse page");
        DashboardSession::with_transport(config, snapshot, Arc::new(CannedTransport::default()))
    }

    #[test]
    fn identifier_join_keeps_later_rows_aligned_after_a_gap() {
        let mut session = session_with(DashboardConfig::default());

        let outcome = session.select_row(RowPosition::new(2));

        assert_eq!(
            outcome,
            SelectionOutcome::Selected {
                position: RowPosition::new(2),
                marker_id: MarkerId::new("3"),
            }
        );
        assert_eq!(session.view_state().center, GeoPoint::new(23.8759, 90.3795));
        assert_eq!(session.view_state().zoom, 15);
        assert_eq!(
            session.select_row(RowPosition::new(1)),
            SelectionOutcome::NoMarker
        );
        assert_eq!(session.view_state().active_row, Some(RowPosition::new(2)));
    }

    #[test]
    fn positional_strategy_pairs_by_order() {
        let mut config = DashboardConfig::default();
        config.map.correlation = CorrelationStrategy::Positional;
        let mut session = session_with(config);

        assert_eq!(session.index().len(), 2);
        assert_eq!(
            session.select_row(RowPosition::new(1)),
            SelectionOutcome::Selected {
                position: RowPosition::new(1),
                marker_id: MarkerId::new("3"),
            }
        );
        assert_eq!(
            session.select_row(RowPosition::new(2)),
            SelectionOutcome::NoMarker
        );
    }

    #[test]
    fn selected_row_is_the_only_active_row_on_the_page() {
        let mut session = session_with(DashboardConfig::default());

        session.select_row(RowPosition::new(0));
        session
            .select_row_by_id(&ComplaintId::new("3"))
            .expect("row exists");

        let view = session.page().view();
        let active: Vec<_> = view.rows.iter().filter(|row| row.active).collect();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].id, ComplaintId::new("3"));
        assert_eq!(
            view.map.popup_html.as_deref(),
            Some("<b>Garbage</b><br>Uttara")
        );
        assert!(matches!(
            session.select_row_by_id(&ComplaintId::new("42")),
            Err(AppError::UnknownRow(_))
        ));
    }

    #[test]
    fn click_on_status_selector_does_not_move_map() {
        let mut session = session_with(DashboardConfig::default());
        let before = session.view_state().clone();

        assert_eq!(
            session.click_row(RowPosition::new(0), "SELECT"),
            SelectionOutcome::Ignored
        );
        assert_eq!(session.view_state(), &before);
        assert!(matches!(
            session.click_row(RowPosition::new(0), "td"),
            SelectionOutcome::Selected { .. }
        ));
    }

    #[test]
    fn filter_hides_rows_without_reindexing() {
        let mut session = session_with(DashboardConfig::default());

        assert_eq!(session.apply_filter("flood"), 1);
        let view = session.page().view();
        let visible: Vec<_> = view
            .rows
            .iter()
            .filter(|row| row.visible)
            .map(|row| row.position)
            .collect();
        assert_eq!(visible, vec![RowPosition::new(1)]);

        assert_eq!(session.apply_filter(""), 3);
        assert!(matches!(
            session.select_row(RowPosition::new(2)),
            SelectionOutcome::Selected { .. }
        ));
    }

    #[tokio::test]
    async fn status_change_updates_badge_and_queues_toast() {
        let session = session_with(DashboardConfig::default());
        let row_id = ComplaintId::new("2");

        let outcome = session
            .change_status(&row_id, StatusLabel::new("In Progress"))
            .await;

        assert!(matches!(outcome, MutationOutcome::Succeeded { .. }));
        let row = session.page().row(&row_id).expect("row exists");
        assert_eq!(row.badge.class_attribute(), "badge status-in-progress");
        assert_eq!(row.selected_status.as_str(), "In Progress");
        assert!(row.control_enabled);

        let toasts = session.toasts().active();
        assert_eq!(toasts.len(), 1);
        assert_eq!(toasts[0].notification.severity, Severity::Success);
        assert_eq!(session.report().mutations.success_total, 1);
    }
}
