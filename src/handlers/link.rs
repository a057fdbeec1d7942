use actix_web::{http::header::LOCATION, web, HttpRequest, HttpResponse, Responder};
use log::{debug, info};

use crate::{
    errors::AppError,
    models::{BulkResultDto, BulkShortenResponseDto, ShortenRequestDto, ShortenResponseDto},
    services::{BulkOutcome, RedirectResolver, ShortenOutcome, ShortenRequest, ShortenService},
    types::Result,
};

/// `POST /api/shorten` for one URL or a `longUrls` batch
pub async fn shorten_handler(
    req: HttpRequest,
    dto: web::Json<ShortenRequestDto>,
    service: web::Data<ShortenService>,
) -> Result<impl Responder> {
    // Reject shape errors before anything touches the store
    let request = ShortenRequest::try_from(dto.into_inner())?;
    let host = req.connection_info().host().to_string();

    let response = match service.shorten(request, &host).await? {
        ShortenOutcome::Single(link) => HttpResponse::Ok().json(ShortenResponseDto::from(link)),
        ShortenOutcome::Bulk(outcomes) => {
            let results = outcomes.into_iter().map(bulk_entry).collect();
            HttpResponse::Ok().json(BulkShortenResponseDto { results })
        }
    };

    Ok(response)
}

fn bulk_entry(outcome: BulkOutcome) -> BulkResultDto {
    match outcome {
        BulkOutcome::Shortened(link) => BulkResultDto::Shortened {
            short_url: link.short_url,
            long_url: link.long_url,
            id: link.id,
        },
        BulkOutcome::Failed { long_url, error } => BulkResultDto::Failed {
            long_url,
            error: AppError::from(error).public_message(),
        },
    }
}

/// `GET /{id}` redirect
pub async fn redirect_handler(
    path: web::Path<String>,
    resolver: web::Data<RedirectResolver>,
) -> Result<impl Responder> {
    let short_id = path.into_inner();
    debug!("Redirect requested for id: {}", short_id);

    let long_url = resolver.resolve(&short_id).await?;

    info!("Redirecting '{}' to '{}'", short_id, long_url);
    Ok(HttpResponse::TemporaryRedirect()
        .insert_header((LOCATION, long_url))
        .finish())
}
