use crate::{
    auth::{
        auth::AuthUser,
        jwt::{generate_access_token, generate_refresh_token, verify_token},
        password::{hash_password, verify_password},
    },
    config::Config,
    model::role::Role,
    models::{CreateUserReq, LoginReqDto, SignupReq, TokenType, UserSql},
};
use actix_web::{HttpRequest, HttpResponse, Responder, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use sqlx::MySqlPool;
use tracing::{debug, error, info, instrument};

use crate::utils::email_cache;
use crate::utils::email_filter;

// auth end points

/// Inserts a new user into the database and updates the Cuckoo filter
async fn insert_user(
    company_id: u64,
    name: &str,
    email: &str,
    password: &str,
    role_id: u8,
    pool: &MySqlPool,
) -> Result<u64, HttpResponse> {
    let hashed = hash_password(password);

    let result = sqlx::query(
        r#"INSERT INTO users (company_id, name, email, password, role_id) VALUES (?, ?, ?, ?, ?)"#,
    )
    .bind(company_id)
    .bind(name)
    .bind(email)
    .bind(hashed)
    .bind(role_id)
    .execute(pool)
    .await;

    match result {
        Ok(res) => {
            // if insert success, populate filter and keep cache warm.
            email_filter::insert(email);
            email_cache::mark_taken(email).await;
            Ok(res.last_insert_id())
        }
        Err(e) => {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.code() == Some("23000".into()) {
                    return Err(HttpResponse::Conflict().json(json!({
                        "error": "Email already registered"
                    })));
                }
            }

            error!(error = %e, "Failed to insert user");
            Err(HttpResponse::InternalServerError().json(json!({
                "error": "Failed to register user"
            })))
        }
    }
}

/// true  => email AVAILABLE
/// false => email TAKEN
pub async fn is_email_available(email: &str, pool: &MySqlPool) -> bool {
    let email = email.trim().to_lowercase();

    // 1️⃣ Cuckoo filter — fast negative
    // if filter says not exist then it is saying true, else it may exist or not.
    if !email_filter::might_exist(&email) {
        return true;
    }

    // 2️⃣ Moka cache — fast positive
    if email_cache::is_taken(&email).await {
        return false;
    }

    // 3️⃣ Database fallback
    let exists =
        sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM users WHERE email = ? LIMIT 1)")
            .bind(&email)
            .fetch_one(pool)
            .await
            .unwrap_or(true); // fail-safe

    !exists
}

/// Signup handler: provisions a company, its settings row and the owner
/// account in one transaction.
pub async fn signup(payload: web::Json<SignupReq>, pool: web::Data<MySqlPool>) -> impl Responder {
    let company_name = payload.company_name.trim();
    let name = payload.name.trim();
    let email = payload.email.trim().to_lowercase();

    if company_name.is_empty() || name.is_empty() || email.is_empty() || payload.password.is_empty()
    {
        return HttpResponse::BadRequest().json(json!({
            "error": "company_name, name, email and password must not be empty"
        }));
    }

    if !is_email_available(&email, pool.get_ref()).await {
        return HttpResponse::Conflict().json(json!({
            "error": "Email already registered"
        }));
    }

    let mut tx = match pool.begin().await {
        Ok(tx) => tx,
        Err(e) => {
            error!(error = %e, "Failed to open signup transaction");
            return HttpResponse::InternalServerError().json(json!({
                "error": "Failed to provision company"
            }));
        }
    };

    // 1️⃣ company
    let company_id = match sqlx::query("INSERT INTO companies (name) VALUES (?)")
        .bind(company_name)
        .execute(&mut *tx)
        .await
    {
        Ok(res) => res.last_insert_id(),
        Err(e) => {
            error!(error = %e, "Failed to create company");
            return HttpResponse::InternalServerError().json(json!({
                "error": "Failed to provision company"
            }));
        }
    };

    // 2️⃣ settings row with no default payment day yet
    if let Err(e) = sqlx::query("INSERT INTO company_settings (company_id) VALUES (?)")
        .bind(company_id)
        .execute(&mut *tx)
        .await
    {
        error!(error = %e, company_id, "Failed to create company settings");
        return HttpResponse::InternalServerError().json(json!({
            "error": "Failed to provision company"
        }));
    }

    // 3️⃣ owner account
    let hashed = hash_password(&payload.password);
    if let Err(e) = sqlx::query(
        r#"INSERT INTO users (company_id, name, email, password, role_id) VALUES (?, ?, ?, ?, ?)"#,
    )
    .bind(company_id)
    .bind(name)
    .bind(&email)
    .bind(hashed)
    .bind(Role::Owner as u8)
    .execute(&mut *tx)
    .await
    {
        if let sqlx::Error::Database(db_err) = &e {
            if db_err.code() == Some("23000".into()) {
                return HttpResponse::Conflict().json(json!({
                    "error": "Email already registered"
                }));
            }
        }
        error!(error = %e, company_id, "Failed to create owner user");
        return HttpResponse::InternalServerError().json(json!({
            "error": "Failed to provision company"
        }));
    }

    if let Err(e) = tx.commit().await {
        error!(error = %e, company_id, "Failed to commit signup");
        return HttpResponse::InternalServerError().json(json!({
            "error": "Failed to provision company"
        }));
    }

    email_filter::insert(&email);
    email_cache::mark_taken(&email).await;

    info!(company_id, "Company provisioned");

    HttpResponse::Created().json(json!({
        "message": "Company registered successfully",
        "company_id": company_id
    }))
}

/// Admin creates an extra account inside their own company.
pub async fn create_user(
    auth: AuthUser,
    payload: web::Json<CreateUserReq>,
    pool: web::Data<MySqlPool>,
) -> actix_web::Result<impl Responder> {
    auth.require_admin()?;

    let name = payload.name.trim();
    let email = payload.email.trim().to_lowercase();

    if name.is_empty() || email.is_empty() || payload.password.is_empty() {
        return Ok(HttpResponse::BadRequest().json(json!({
            "error": "name, email and password must not be empty"
        })));
    }

    // Owners are created by signup only.
    if !matches!(Role::from_id(payload.role_id), Some(Role::Admin | Role::Member)) {
        return Ok(HttpResponse::BadRequest().json(json!({
            "error": "role_id must be 2 (admin) or 3 (member)"
        })));
    }

    if !is_email_available(&email, pool.get_ref()).await {
        return Ok(HttpResponse::Conflict().json(json!({
            "error": "Email already registered"
        })));
    }

    match insert_user(
        auth.company_id,
        name,
        &email,
        &payload.password,
        payload.role_id,
        pool.get_ref(),
    )
    .await
    {
        Ok(user_id) => Ok(HttpResponse::Created().json(json!({
            "message": "User created successfully",
            "user_id": user_id
        }))),
        Err(err_resp) => Ok(err_resp),
    }
}

/// Admin deletes an account from their own company. Owners cannot be
/// deleted and nobody can delete themselves.
pub async fn delete_user(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    auth.require_admin()?;

    let user_id = path.into_inner();

    if user_id == auth.user_id {
        return Ok(HttpResponse::BadRequest().json(json!({
            "error": "Cannot delete your own account"
        })));
    }

    let target = sqlx::query_as::<_, (String, u8)>(
        r#"SELECT email, role_id FROM users WHERE id = ? AND company_id = ?"#,
    )
    .bind(user_id)
    .bind(auth.company_id)
    .fetch_optional(pool.get_ref())
    .await
    .map_err(|e| {
        error!(error = %e, user_id, "Failed to fetch user");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    let (email, role_id) = match target {
        Some(t) => t,
        None => {
            return Ok(HttpResponse::NotFound().json(json!({
                "error": "User not found"
            })));
        }
    };

    if Role::from_id(role_id) == Some(Role::Owner) {
        return Ok(HttpResponse::BadRequest().json(json!({
            "error": "The company owner cannot be deleted"
        })));
    }

    sqlx::query(r#"DELETE FROM users WHERE id = ? AND company_id = ?"#)
        .bind(user_id)
        .bind(auth.company_id)
        .execute(pool.get_ref())
        .await
        .map_err(|e| {
            error!(error = %e, user_id, "Failed to delete user");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;

    email_filter::remove(&email);
    email_cache::invalidate(&email).await;

    Ok(HttpResponse::Ok().json(json!({
        "message": "User deleted successfully"
    })))
}

#[derive(Serialize, Deserialize)]
struct LoginResponse {
    access_token: String,
    refresh_token: String,
}

#[instrument(
    name = "auth_login",
    skip(pool, config, user),
    fields(email = %user.email)
)]
pub async fn login(
    user: web::Json<LoginReqDto>,
    pool: web::Data<MySqlPool>,
    config: web::Data<Config>,
) -> impl Responder {
    info!("Login request received");

    // 1️⃣ Basic validation
    if user.email.trim().is_empty() || user.password.is_empty() {
        info!("Validation failed: empty email or password");
        return HttpResponse::BadRequest().body("Email or password required");
    }

    debug!("Fetching user from database");

    // 2️⃣ Fetch user
    let db_user = match sqlx::query_as::<_, UserSql>(
        r#"
        SELECT id, company_id, name, email, password, role_id
        FROM users
        WHERE email = ?
        "#,
    )
    .bind(user.email.trim().to_lowercase())
    .fetch_optional(pool.get_ref())
    .await
    {
        Ok(Some(user)) => {
            debug!(user_id = user.id, "User found");
            user
        }
        Ok(None) => {
            info!("Invalid credentials: user not found");
            return HttpResponse::Unauthorized().body("Invalid credentials");
        }
        Err(e) => {
            error!(error = %e, "Database error while fetching user");
            return HttpResponse::InternalServerError().finish();
        }
    };

    // 3️⃣ Verify password
    if let Err(e) = verify_password(&user.password, &db_user.password) {
        info!(error = %e, "Invalid credentials: password mismatch");
        return HttpResponse::Unauthorized().body("Invalid credentials");
    }

    debug!("Password verified");

    // 4️⃣ Generate tokens
    let access_token = generate_access_token(
        db_user.id,
        db_user.email.clone(),
        db_user.role_id,
        db_user.company_id,
        &config.jwt_secret,
        config.access_token_ttl,
    );

    let (refresh_token, refresh_claims) = generate_refresh_token(
        db_user.id,
        db_user.email.clone(),
        db_user.role_id,
        db_user.company_id,
        &config.jwt_secret,
        config.refresh_token_ttl,
    );

    // 5️⃣ Store refresh token
    debug!(
        user_id = db_user.id,
        jti = %refresh_claims.jti,
        "Storing refresh token"
    );

    if let Err(e) = sqlx::query(
        r#"
        INSERT INTO refresh_tokens (user_id, jti, expires_at)
        VALUES (?, ?, FROM_UNIXTIME(?))
        "#,
    )
    .bind(db_user.id)
    .bind(&refresh_claims.jti)
    .bind(refresh_claims.exp as i64)
    .execute(pool.get_ref())
    .await
    {
        error!(error = %e, "Failed to store refresh token");
        return HttpResponse::InternalServerError().finish();
    }

    // 6️⃣ Update last_login_at (non-fatal)
    if let Err(e) = sqlx::query("UPDATE users SET last_login_at = NOW() WHERE id = ?")
        .bind(db_user.id)
        .execute(pool.get_ref())
        .await
    {
        error!(error = %e, "Failed to update last_login_at");
        // intentionally not failing login
    }

    info!("Login successful");

    HttpResponse::Ok().json(LoginResponse {
        access_token,
        refresh_token,
    })
}

pub async fn refresh_token(
    req: HttpRequest,
    pool: web::Data<MySqlPool>,
    config: web::Data<Config>,
) -> impl Responder {
    let header = match req.headers().get("Authorization") {
        Some(h) => h.to_str().unwrap_or(""),
        None => return HttpResponse::Unauthorized().body("No token"),
    };

    let token = match header.strip_prefix("Bearer ") {
        Some(t) => t,
        None => return HttpResponse::Unauthorized().body("Invalid token"),
    };

    let claims = match verify_token(token, &config.jwt_secret) {
        Ok(c) => c,
        Err(_) => return HttpResponse::Unauthorized().finish(),
    };

    if claims.token_type != TokenType::Refresh {
        return HttpResponse::Unauthorized().finish();
    }

    // 🔍 find refresh token in DB
    let record = match sqlx::query_as::<_, (u64, u64, bool)>(
        r#"
        SELECT id, user_id, revoked
        FROM refresh_tokens
        WHERE jti = ?
        "#,
    )
    .bind(&claims.jti)
    .fetch_optional(pool.get_ref())
    .await
    {
        Ok(r) => r,
        Err(e) => {
            error!(error = %e, "Failed to fetch refresh token");
            return HttpResponse::InternalServerError().finish();
        }
    };

    let (record_id, user_id) = match record {
        Some((id, user_id, revoked)) if !revoked => (id, user_id),
        _ => return HttpResponse::Unauthorized().finish(),
    };

    // 🔥 revoke old refresh token
    if let Err(e) = sqlx::query("UPDATE refresh_tokens SET revoked = TRUE WHERE id = ?")
        .bind(record_id)
        .execute(pool.get_ref())
        .await
    {
        error!(error = %e, "Failed to revoke refresh token");
        return HttpResponse::InternalServerError().finish();
    }

    // 🔄 issue new refresh token
    let (new_refresh_token, new_claims) = generate_refresh_token(
        claims.user_id,
        claims.sub.clone(),
        claims.role,
        claims.company_id,
        &config.jwt_secret,
        config.refresh_token_ttl,
    );

    if let Err(e) = sqlx::query(
        r#"
        INSERT INTO refresh_tokens (user_id, jti, expires_at)
        VALUES (?, ?, FROM_UNIXTIME(?))
        "#,
    )
    .bind(user_id)
    .bind(&new_claims.jti)
    .bind(new_claims.exp as i64)
    .execute(pool.get_ref())
    .await
    {
        error!(error = %e, "Failed to store refresh token");
        return HttpResponse::InternalServerError().finish();
    }

    // 🎫 new access token
    let access_token = generate_access_token(
        claims.user_id,
        claims.sub.clone(),
        claims.role,
        claims.company_id,
        &config.jwt_secret,
        config.access_token_ttl,
    );

    HttpResponse::Ok().json(serde_json::json!({
        "access_token": access_token,
        "refresh_token": new_refresh_token
    }))
}

pub async fn logout(
    req: HttpRequest,
    pool: web::Data<MySqlPool>,
    config: web::Data<Config>,
) -> impl Responder {
    let header = match req.headers().get("Authorization") {
        Some(h) => h.to_str().unwrap_or(""),
        None => return HttpResponse::NoContent().finish(),
    };

    let token = match header.strip_prefix("Bearer ") {
        Some(t) => t,
        None => return HttpResponse::NoContent().finish(),
    };

    let claims = match verify_token(token, &config.jwt_secret) {
        Ok(c) => c,
        Err(_) => return HttpResponse::NoContent().finish(),
    };

    // only refresh tokens can logout
    if claims.token_type != TokenType::Refresh {
        return HttpResponse::NoContent().finish();
    }

    // revoke refresh token (idempotent)
    let _ = sqlx::query("UPDATE refresh_tokens SET revoked = 1 WHERE jti = ?")
        .bind(&claims.jti)
        .execute(pool.get_ref())
        .await;

    // success (even if token didn't exist)
    HttpResponse::NoContent().finish()
}
