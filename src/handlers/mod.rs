pub mod auth;
pub mod calendar;
pub mod clients;
pub mod invoices;
pub mod meetings;
pub mod payment_methods;
pub mod profile;
pub mod projects;

use actix_web::web;

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    // ── Every route is protected by the AuthenticatedUser extractor ──
    cfg.service(web::scope("/auth").route("/me", web::get().to(auth::me)));

    cfg.service(
        web::resource("/user/profile")
            .route(web::get().to(profile::get_profile))
            .route(web::put().to(profile::update_profile)),
    );

    // ── Projects: board and calendar before /{id} so they are not taken as ids ──
    cfg.service(
        web::scope("/projects")
            .route("", web::get().to(projects::get_projects))
            .route("", web::post().to(projects::create_project))
            .route("/board", web::get().to(projects::get_board))
            .route(
                "/board/{status}/rebalance",
                web::post().to(projects::rebalance_column),
            )
            .route("/calendar", web::get().to(projects::get_calendar))
            .route("/{id}", web::get().to(projects::get_project))
            .route("/{id}", web::put().to(projects::update_project))
            .route("/{id}", web::delete().to(projects::delete_project))
            .route("/{id}/move", web::put().to(projects::move_project))
            .route("/{id}/schedule", web::put().to(projects::schedule_project)),
    );

    cfg.service(
        web::scope("/calendar")
            .route("", web::get().to(calendar::get_events))
            .route("", web::post().to(calendar::create_event))
            .route("/{id}", web::get().to(calendar::get_event))
            .route("/{id}", web::put().to(calendar::update_event))
            .route("/{id}", web::delete().to(calendar::delete_event)),
    );

    cfg.service(
        web::scope("/invoices")
            .route("", web::get().to(invoices::get_invoices))
            .route("", web::post().to(invoices::create_invoice))
            .route("/{id}", web::put().to(invoices::update_invoice))
            .route("/{id}", web::delete().to(invoices::delete_invoice)),
    );

    cfg.service(
        web::scope("/payment-methods")
            .route("", web::get().to(payment_methods::get_payment_methods))
            .route("", web::post().to(payment_methods::create_payment_method))
            .route("/{id}/default", web::put().to(payment_methods::set_default))
            .route("/{id}", web::delete().to(payment_methods::delete_payment_method)),
    );

    cfg.service(
        web::scope("/clients")
            .route("", web::get().to(clients::get_clients))
            .route("", web::post().to(clients::create_client))
            .route("/{id}", web::put().to(clients::update_client))
            .route("/{id}", web::delete().to(clients::delete_client)),
    );

    cfg.service(
        web::scope("/meetings")
            .route("", web::get().to(meetings::get_upcoming))
            .route("", web::post().to(meetings::create_meeting)),
    );
}
