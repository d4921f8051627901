//! # Server Configuration
//!
//! This module contains the server setup and routing for the Cardlend API.

use axum::{
    Router,
    routing::{get, post},
};
use sea_orm::DatabaseConnection;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::config::AppConfig;
use crate::handlers;

/// Application state containing shared resources
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub config: AppConfig,
}

/// Creates and configures the Axum application router
pub fn create_app(state: AppState) -> Router {
    let api = Router::new()
        .route("/health", get(handlers::health))
        .route(
            "/companies",
            post(handlers::companies::create_company).get(handlers::companies::list_companies),
        )
        .route(
            "/companies/{id}",
            get(handlers::companies::get_company)
                .put(handlers::companies::update_company)
                .delete(handlers::companies::delete_company),
        )
        .route(
            "/companies/{id}/users",
            get(handlers::companies::list_company_users),
        )
        .route(
            "/companies/{id}/accounts",
            get(handlers::companies::list_company_accounts),
        )
        .route(
            "/companies/{id}/loans",
            get(handlers::companies::list_company_loans),
        )
        .route(
            "/companies/{id}/dashboard",
            get(handlers::dashboard::get_dashboard),
        )
        .route(
            "/users",
            post(handlers::users::create_user).get(handlers::users::list_users),
        )
        .route(
            "/users/{id}",
            get(handlers::users::get_user)
                .put(handlers::users::update_user)
                .delete(handlers::users::delete_user),
        )
        .route(
            "/accounts",
            post(handlers::accounts::create_account).get(handlers::accounts::list_accounts),
        )
        .route(
            "/accounts/{id}",
            get(handlers::accounts::get_account)
                .put(handlers::accounts::update_account)
                .delete(handlers::accounts::delete_account),
        )
        .route(
            "/accounts/{id}/cards",
            get(handlers::accounts::list_account_cards),
        )
        .route(
            "/accounts/{id}/transactions",
            get(handlers::transactions::list_account_transactions),
        )
        .route(
            "/loans",
            post(handlers::loans::create_loan).get(handlers::loans::list_loans),
        )
        .route(
            "/loans/{id}",
            get(handlers::loans::get_loan)
                .put(handlers::loans::update_loan)
                .delete(handlers::loans::delete_loan),
        )
        .route(
            "/loans/{id}/transactions",
            get(handlers::transactions::list_loan_transactions),
        )
        .route(
            "/cards",
            post(handlers::cards::create_card).get(handlers::cards::list_cards),
        )
        .route(
            "/cards/{id}",
            get(handlers::cards::get_card)
                .put(handlers::cards::update_card)
                .delete(handlers::cards::delete_card),
        )
        .route(
            "/cards/{id}/transactions",
            get(handlers::transactions::list_card_transactions),
        )
        .route(
            "/transactions",
            post(handlers::transactions::create_transaction)
                .get(handlers::transactions::list_transactions),
        )
        // Transactions are append-only: no delete route
        .route(
            "/transactions/{id}",
            get(handlers::transactions::get_transaction)
                .put(handlers::transactions::update_transaction),
        );

    Router::new()
        .route("/", get(handlers::root))
        .nest("/api", api)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
        .merge(SwaggerUi::new("/docs").url("/openapi.json", ApiDoc::openapi()))
}

/// Starts the server with the given configuration
pub async fn run_server(
    config: AppConfig,
    db: DatabaseConnection,
) -> Result<(), Box<dyn std::error::Error>> {
    let addr = config
        .bind_addr()
        .map_err(|e| format!("Invalid server address: {}", e))?;
    let profile = config.profile.clone();

    let state = AppState { db, config };
    let app = create_app(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, %profile, "Server listening");

    axum::serve(listener, app).await?;

    Ok(())
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::root,
        crate::handlers::health,
        crate::handlers::companies::create_company,
        crate::handlers::companies::list_companies,
        crate::handlers::companies::get_company,
        crate::handlers::companies::update_company,
        crate::handlers::companies::delete_company,
        crate::handlers::companies::list_company_users,
        crate::handlers::companies::list_company_accounts,
        crate::handlers::companies::list_company_loans,
        crate::handlers::users::create_user,
        crate::handlers::users::list_users,
        crate::handlers::users::get_user,
        crate::handlers::users::update_user,
        crate::handlers::users::delete_user,
        crate::handlers::accounts::create_account,
        crate::handlers::accounts::list_accounts,
        crate::handlers::accounts::get_account,
        crate::handlers::accounts::update_account,
        crate::handlers::accounts::delete_account,
        crate::handlers::accounts::list_account_cards,
        crate::handlers::loans::create_loan,
        crate::handlers::loans::list_loans,
        crate::handlers::loans::get_loan,
        crate::handlers::loans::update_loan,
        crate::handlers::loans::delete_loan,
        crate::handlers::cards::create_card,
        crate::handlers::cards::list_cards,
        crate::handlers::cards::get_card,
        crate::handlers::cards::update_card,
        crate::handlers::cards::delete_card,
        crate::handlers::transactions::create_transaction,
        crate::handlers::transactions::list_transactions,
        crate::handlers::transactions::get_transaction,
        crate::handlers::transactions::update_transaction,
        crate::handlers::transactions::list_account_transactions,
        crate::handlers::transactions::list_card_transactions,
        crate::handlers::transactions::list_loan_transactions,
        crate::handlers::dashboard::get_dashboard,
    ),
    components(
        schemas(
            crate::models::ServiceInfo,
            crate::models::company::Model,
            crate::models::user::Model,
            crate::models::account::Model,
            crate::models::account::AccountType,
            crate::models::loan::Model,
            crate::models::loan::LoanStatus,
            crate::models::card::Model,
            crate::models::card::CardStatus,
            crate::models::transaction::Model,
            crate::models::transaction::TransactionType,
            crate::models::transaction::TransactionStatus,
            crate::error::ApiError,
            crate::error::FieldViolation,
            crate::handlers::companies::CreateCompanyDto,
            crate::handlers::companies::UpdateCompanyDto,
            crate::handlers::users::CreateUserDto,
            crate::handlers::users::UpdateUserDto,
            crate::handlers::accounts::CreateAccountDto,
            crate::handlers::accounts::UpdateAccountDto,
            crate::handlers::loans::CreateLoanDto,
            crate::handlers::loans::UpdateLoanDto,
            crate::handlers::cards::CreateCardDto,
            crate::handlers::cards::UpdateCardDto,
            crate::handlers::transactions::CreateTransactionDto,
            crate::handlers::transactions::UpdateTransactionDto,
            crate::handlers::dashboard::DashboardDto,
            crate::handlers::dashboard::TransactionPageDto,
            crate::handlers::dashboard::SpendingSummaryDto,
        )
    ),
    info(
        title = "Cardlend API",
        description = "Business card and lending backend",
        version = env!("CARGO_PKG_VERSION"),
    )
)]
pub struct ApiDoc;
