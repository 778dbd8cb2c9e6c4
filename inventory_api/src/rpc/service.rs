//! `InventoryService` gRPC implementation. Every business failure is encoded
//! as `success: false` + `error` on an `Ok` response; only a genuine
//! infrastructure failure (one `AppError` can't represent) would surface as
//! a `tonic::Status` (spec.md §4.5).

use tonic::{Request, Response, Status};

use inventory_core::dto::availability::CheckAvailabilityRequest as CoreAvailabilityRequest;
use inventory_core::dto::transition::TransitionContext;
use inventory_core::models::InventoryItem;
use inventory_core::services::{InventoryService as CoreInventoryService, QueryService};
use shared_error::AppError;

use super::proto;
use crate::state::AppState;

fn default_location(location: &str) -> String {
    if location.is_empty() {
        "default".to_string()
    } else {
        location.to_string()
    }
}

fn stock_item(item: &InventoryItem) -> proto::StockItem {
    proto::StockItem {
        sku: item.sku.clone(),
        location: item.location.clone(),
        quantity_on_hand: item.quantity_on_hand,
        quantity_reserved: item.quantity_reserved,
        quantity_available: item.quantity_available(),
        in_stock: item.is_in_stock(),
        backorderable: item.backorderable,
    }
}

fn error_response(error: AppError) -> proto::StockResponse {
    proto::StockResponse {
        success: false,
        error: error.public_message(),
        item: None,
    }
}

pub struct InventoryGrpcService {
    state: AppState,
}

impl InventoryGrpcService {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }
}

#[tonic::async_trait]
impl proto::inventory_service_server::InventoryService for InventoryGrpcService {
    async fn get_stock(
        &self,
        request: Request<proto::GetStockRequest>,
    ) -> Result<Response<proto::StockResponse>, Status> {
        let req = request.into_inner();
        let location = default_location(&req.location);
        let response = match self.state.inventory_service.get_item(&req.sku, &location).await {
            Ok(item) => proto::StockResponse {
                success: true,
                error: String::new(),
                item: Some(stock_item(&item)),
            },
            Err(e) => error_response(e),
        };
        Ok(Response::new(response))
    }

    async fn adjust_stock(
        &self,
        request: Request<proto::AdjustStockRequest>,
    ) -> Result<Response<proto::StockResponse>, Status> {
        let req = request.into_inner();
        let location = default_location(&req.location);
        let ctx = TransitionContext {
            reason: if req.reason.is_empty() { None } else { Some(req.reason) },
            reference_type: None,
            reference_id: None,
            metadata: None,
        };
        let response = match self
            .state
            .inventory_service
            .adjust(&req.sku, &location, req.quantity, ctx)
            .await
        {
            Ok((item, _movement)) => proto::StockResponse {
                success: true,
                error: String::new(),
                item: Some(stock_item(&item)),
            },
            Err(e) => error_response(e),
        };
        Ok(Response::new(response))
    }

    async fn reserve_stock(
        &self,
        request: Request<proto::ReserveStockRequest>,
    ) -> Result<Response<proto::ReserveStockResponse>, Status> {
        let req = request.into_inner();
        let location = default_location(&req.location);
        let ctx = TransitionContext {
            reason: None,
            reference_type: if req.reference_type.is_empty() { None } else { Some(req.reference_type) },
            reference_id: if req.reference_id.is_empty() { None } else { Some(req.reference_id) },
            metadata: None,
        };
        let response = match self
            .state
            .inventory_service
            .reserve(&req.sku, &location, req.quantity, ctx)
            .await
        {
            Ok((item, _movement, reservation_id)) => proto::ReserveStockResponse {
                success: true,
                error: String::new(),
                item: Some(stock_item(&item)),
                reservation_id,
            },
            Err(e) => proto::ReserveStockResponse {
                success: false,
                error: e.public_message(),
                item: None,
                reservation_id: String::new(),
            },
        };
        Ok(Response::new(response))
    }

    async fn release_reservation(
        &self,
        request: Request<proto::ReleaseReservationRequest>,
    ) -> Result<Response<proto::StockResponse>, Status> {
        let req = request.into_inner();
        let location = default_location(&req.location);
        let response = match self
            .state
            .inventory_service
            .release(&req.sku, &location, req.quantity, TransitionContext::default())
            .await
        {
            Ok((item, _movement)) => proto::StockResponse {
                success: true,
                error: String::new(),
                item: Some(stock_item(&item)),
            },
            Err(e) => error_response(e),
        };
        Ok(Response::new(response))
    }

    async fn commit_reservation(
        &self,
        request: Request<proto::CommitReservationRequest>,
    ) -> Result<Response<proto::StockResponse>, Status> {
        let req = request.into_inner();
        let location = default_location(&req.location);
        let response = match self
            .state
            .inventory_service
            .commit(&req.sku, &location, req.quantity, TransitionContext::default())
            .await
        {
            Ok((item, _movement)) => proto::StockResponse {
                success: true,
                error: String::new(),
                item: Some(stock_item(&item)),
            },
            Err(e) => error_response(e),
        };
        Ok(Response::new(response))
    }

    async fn check_availability(
        &self,
        request: Request<proto::CheckAvailabilityRequest>,
    ) -> Result<Response<proto::CheckAvailabilityResponse>, Status> {
        let req = request.into_inner();
        let location = if req.location.is_empty() { None } else { Some(req.location) };
        let response = match self
            .state
            .query_service
            .check_availability(&req.sku, req.quantity, location.as_deref())
            .await
        {
            Ok(report) => proto::CheckAvailabilityResponse {
                success: true,
                error: String::new(),
                total_available: report.total_available,
                is_available: report.is_available,
                backorderable: report.backorderable,
            },
            Err(e) => proto::CheckAvailabilityResponse {
                success: false,
                error: e.public_message(),
                total_available: 0,
                is_available: false,
                backorderable: false,
            },
        };
        Ok(Response::new(response))
    }

    async fn bulk_check_availability(
        &self,
        request: Request<proto::BulkCheckAvailabilityRequest>,
    ) -> Result<Response<proto::BulkCheckAvailabilityResponse>, Status> {
        let req = request.into_inner();
        let core_requests: Vec<CoreAvailabilityRequest> = req
            .requests
            .into_iter()
            .map(|r| CoreAvailabilityRequest {
                sku: r.sku,
                quantity: r.quantity,
                location: if r.location.is_empty() { None } else { Some(r.location) },
            })
            .collect();

        let responses = match self.state.query_service.check_bulk_availability(core_requests).await {
            Ok(reports) => reports
                .into_iter()
                .map(|report| proto::CheckAvailabilityResponse {
                    success: true,
                    error: String::new(),
                    total_available: report.total_available,
                    is_available: report.is_available,
                    backorderable: report.backorderable,
                })
                .collect(),
            Err(e) => vec![proto::CheckAvailabilityResponse {
                success: false,
                error: e.public_message(),
                total_available: 0,
                is_available: false,
                backorderable: false,
            }],
        };

        Ok(Response::new(proto::BulkCheckAvailabilityResponse { responses }))
    }
}
