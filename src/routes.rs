use crate::{
    api::{automation, commission, expense, reports, settings, team_member, team_payment},
    auth::{handlers, middleware::auth_middleware},
    config::Config,
};
use actix_governor::{
    Governor, GovernorConfigBuilder, PeerIpKeyExtractor, governor::middleware::NoOpMiddleware,
};
use actix_web::{middleware::from_fn, web};

pub fn configure(cfg: &mut web::ServiceConfig, config: Config) {
    // Helper to build per-route limiter
    fn build_limiter(requests_per_min: u32) -> Governor<PeerIpKeyExtractor, NoOpMiddleware> {
        let per_ms = if requests_per_min == 0 {
            1
        } else {
            60_000 / requests_per_min as u64
        };
        let cfg = GovernorConfigBuilder::default()
            .per_millisecond(per_ms)
            .burst_size(requests_per_min)
            .key_extractor(PeerIpKeyExtractor)
            .finish()
            .unwrap();
        Governor::new(&cfg)
    }

    let login_limiter = build_limiter(config.rate_login_per_min);
    let signup_limiter = build_limiter(config.rate_signup_per_min);
    let refresh_limiter = build_limiter(config.rate_refresh_per_min);
    let protected_limiter = build_limiter(config.rate_protected_per_min);
    let cron_limiter = build_limiter(config.rate_cron_per_min);

    // Public routes
    cfg.service(
        web::scope("/auth")
            .service(
                web::resource("/login")
                    .wrap(login_limiter.clone())
                    .route(web::post().to(handlers::login)),
            )
            .service(
                web::resource("/signup")
                    .wrap(signup_limiter.clone())
                    .route(web::post().to(handlers::signup)),
            )
            .service(
                web::resource("/refresh")
                    .wrap(refresh_limiter.clone())
                    .route(web::post().to(handlers::refresh_token)),
            )
            .service(
                web::resource("/logout")
                    .wrap(login_limiter.clone())
                    .route(web::post().to(handlers::logout)),
            ),
    );

    // Scheduler entry point, authenticated by X-Automation-Key
    cfg.service(
        web::scope("/cron").service(
            web::resource("/automation/run")
                .wrap(cron_limiter)
                .route(web::get().to(automation::run_automation_cron))
                .route(web::post().to(automation::run_automation_cron)),
        ),
    );

    // Protected routes
    cfg.service(
        web::scope(&config.api_prefix)
            .wrap(from_fn(auth_middleware))
            // authentication
            .wrap(protected_limiter) // rate limiting
            .service(
                web::scope("/users")
                    // /users
                    .service(web::resource("").route(web::post().to(handlers::create_user)))
                    // /users/{id}
                    .service(
                        web::resource("/{id}").route(web::delete().to(handlers::delete_user)),
                    ),
            )
            .service(
                web::scope("/team-members")
                    // /team-members
                    .service(
                        web::resource("")
                            .route(web::post().to(team_member::create_team_member))
                            .route(web::get().to(team_member::list_team_members)),
                    )
                    // /team-members/{id}
                    .service(
                        web::resource("/{id}")
                            .route(web::put().to(team_member::update_team_member))
                            .route(web::get().to(team_member::get_team_member))
                            .route(web::delete().to(team_member::delete_team_member)),
                    ),
            )
            .service(
                web::scope("/payments")
                    // /payments
                    .service(
                        web::resource("")
                            .route(web::post().to(team_payment::create_payment))
                            .route(web::get().to(team_payment::list_payments)),
                    )
                    // /payments/{id}/pay
                    .service(
                        web::resource("/{id}/pay")
                            .route(web::put().to(team_payment::mark_payment_paid)),
                    ),
            )
            .service(
                web::scope("/commissions")
                    .service(
                        web::resource("")
                            .route(web::post().to(commission::create_commission))
                            .route(web::get().to(commission::list_commissions)),
                    )
                    .service(
                        web::resource("/{id}/pay")
                            .route(web::put().to(commission::mark_commission_paid)),
                    ),
            )
            .service(
                web::scope("/expenses")
                    .service(
                        web::resource("")
                            .route(web::post().to(expense::create_expense))
                            .route(web::get().to(expense::list_expenses)),
                    )
                    .service(
                        web::resource("/{id}/pay")
                            .route(web::put().to(expense::mark_expense_paid)),
                    ),
            )
            .service(
                web::scope("/settings").service(
                    web::resource("")
                        .route(web::get().to(settings::get_settings))
                        .route(web::put().to(settings::update_settings)),
                ),
            )
            .service(
                web::scope("/reports")
                    .service(web::resource("/summary").route(web::get().to(reports::summary))),
            )
            .service(
                web::scope("/automation").service(
                    web::resource("/run")
                        .route(web::get().to(automation::run_automation))
                        .route(web::post().to(automation::run_automation)),
                ),
            ),
    );
}

// LOGIN
//  ├─ access_token (15 min)
//  └─ refresh_token (7 days)
//
// API REQUEST
//  └─ Authorization: Bearer access_token
//
// SCHEDULER
//  └─ GET/POST /cron/automation/run with X-Automation-Key
