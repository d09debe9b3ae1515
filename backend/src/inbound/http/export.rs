//! File downloads of the four inventory tables.

use actix_web::http::header::{self, ContentDisposition, DispositionParam, DispositionType};
use actix_web::{HttpResponse, get, web};

use crate::domain::{ExportEntity, ExportFormat, ExportTable};

use super::ApiResult;
use super::gate::{Authorized, Viewers};
use super::state::HttpState;

async fn load_table(state: &HttpState, entity: ExportEntity) -> ApiResult<ExportTable> {
    let inventory = &state.inventory;
    Ok(match entity {
        ExportEntity::Assets => ExportTable::assets(&inventory.list_assets().await?),
        ExportEntity::Employees => ExportTable::employees(&inventory.list_employees().await?),
        ExportEntity::Maintenance => ExportTable::maintenance(&inventory.list_maintenance().await?),
        ExportEntity::Licenses => ExportTable::licenses(&inventory.list_licenses().await?),
    })
}

/// `GET /export/{entity}/{csv|excel}` as an attachment.
#[get("/export/{entity}/{format}")]
pub async fn export_table(
    state: web::Data<HttpState>,
    caller: Authorized<Viewers>,
    path: web::Path<(String, String)>,
) -> ApiResult<HttpResponse> {
    let (entity, format) = path.into_inner();
    let entity: ExportEntity = entity.parse()?;
    let format: ExportFormat = format.parse()?;
    let encoder = match format {
        ExportFormat::Csv => std::sync::Arc::clone(&state.csv),
        ExportFormat::Excel => state.spreadsheet.encoder()?,
    };

    let table = load_table(&state, entity).await?;
    let bytes = encoder.encode(&table)?;
    let file_name = table.file_name(encoder.extension());
    tracing::info!(
        entity = %entity,
        rows = table.rows().len(),
        user_id = %caller.user().id(),
        "export generated"
    );

    Ok(HttpResponse::Ok()
        .insert_header((header::CONTENT_TYPE, encoder.content_type()))
        .insert_header(ContentDisposition {
            disposition: DispositionType::Attachment,
            parameters: vec![DispositionParam::Filename(file_name)],
        })
        .body(bytes))
}
