//! Export service implementation.

use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use futures::future::try_join_all;
use tracing::{debug, info, warn};

use super::error::ExportError;
use super::types::{Artifact, ArtifactStore, ExportOutput, RenderedVisual, VisualRegion};
use crate::analytics::{AggregateParams, AggregationEngine, SummaryService, ViewKind};
use crate::records::Record;
use crate::report::templates::{CapturedVisual, dashboard_report, records_report};
use crate::report::{DocumentAssembler, PageGeometry, ReportDocument, Section};

/// Produces raster artifacts for screen regions.
///
/// Implemented outside the core by whatever captures the rendered visuals.
#[async_trait]
pub trait ArtifactRenderer: Send + Sync {
    /// Renders one region. Resolves once the artifact is ready.
    async fn render(&self, region: &VisualRegion) -> Result<Artifact, ExportError>;
}

/// Encodes an assembled document into its final byte form.
#[async_trait]
pub trait DocumentWriter: Send + Sync {
    /// Writes `document`, pulling image data from `artifacts`.
    async fn write(
        &self,
        document: &ReportDocument,
        artifacts: &ArtifactStore,
    ) -> Result<Bytes, ExportError>;
}

/// Sequences rendering, layout, and writing for one export.
pub struct ExportService<R: ArtifactRenderer, W: DocumentWriter> {
    renderer: Arc<R>,
    writer: Arc<W>,
    assembler: DocumentAssembler,
}

impl<R: ArtifactRenderer, W: DocumentWriter> ExportService<R, W> {
    /// Create a new export service.
    ///
    /// # Errors
    ///
    /// Returns an error if the geometry cannot hold content.
    pub fn new(
        renderer: Arc<R>,
        writer: Arc<W>,
        geometry: PageGeometry,
    ) -> Result<Self, ExportError> {
        Ok(Self {
            renderer,
            writer,
            assembler: DocumentAssembler::new(geometry)?,
        })
    }

    /// Renders every region concurrently and waits for all of them.
    ///
    /// Results keep the order of `regions` regardless of completion order.
    /// The first failure aborts the whole batch.
    pub async fn render_all(
        &self,
        regions: &[VisualRegion],
    ) -> Result<(Vec<RenderedVisual>, ArtifactStore), ExportError> {
        let artifacts = try_join_all(regions.iter().map(|region| self.renderer.render(region)))
            .await
            .inspect_err(|e| warn!(error = %e, "Artifact rendering failed"))?;

        let mut store = ArtifactStore::default();
        let mut visuals = Vec::with_capacity(artifacts.len());
        for (region, artifact) in regions.iter().zip(artifacts) {
            debug!(
                region = %region.name,
                artifact = %artifact.meta.id,
                width = artifact.meta.pixel_width,
                height = artifact.meta.pixel_height,
                "Artifact ready"
            );
            visuals.push(RenderedVisual {
                region: region.clone(),
                meta: artifact.meta,
            });
            store.insert(artifact);
        }
        Ok((visuals, store))
    }

    /// Runs a full export.
    ///
    /// `build` turns the rendered visuals into sections once all of them are
    /// ready. Any failure aborts the export and nothing partial is returned.
    pub async fn export<F>(
        &self,
        regions: &[VisualRegion],
        build: F,
    ) -> Result<ExportOutput, ExportError>
    where
        F: FnOnce(&[RenderedVisual]) -> Result<Vec<Section>, ExportError> + Send,
    {
        let (visuals, store) = self.render_all(regions).await?;
        let sections = build(&visuals)?;
        let document = self.assembler.assemble(&sections)?;

        let bytes = self
            .writer
            .write(&document, &store)
            .await
            .inspect_err(|e| warn!(error = %e, "Document writer failed"))?;

        info!(
            regions = regions.len(),
            pages = document.page_count(),
            bytes = bytes.len(),
            "Export completed"
        );
        Ok(ExportOutput { document, bytes })
    }

    /// Exports the records report: one image per region, then every record.
    pub async fn export_records_report(
        &self,
        records: &[Record],
        regions: &[VisualRegion],
        generated_at: DateTime<Utc>,
    ) -> Result<ExportOutput, ExportError> {
        self.export(regions, |visuals| {
            let captured: Vec<CapturedVisual> =
                visuals.iter().map(RenderedVisual::captured).collect();
            Ok(records_report(records, &captured, generated_at))
        })
        .await
    }

    /// Exports the dashboard report. `limit` caps the crop and village tables.
    ///
    /// Summary figures are computed before anything is rendered, so a
    /// malformed record fails the export without touching the renderer.
    pub async fn export_dashboard_report(
        &self,
        records: &[Record],
        dashboard: Option<VisualRegion>,
        limit: usize,
        generated_at: DateTime<Utc>,
    ) -> Result<ExportOutput, ExportError> {
        let summary = SummaryService::summarize(records)?;
        let crops = AggregationEngine::aggregate(
            records,
            ViewKind::CropArea,
            &AggregateParams::default().with_limit(limit),
        )?;
        let villages = SummaryService::village_stats(records, limit)?;
        let regions: Vec<VisualRegion> = dashboard.into_iter().collect();

        self.export(&regions, |visuals| {
            let visual = visuals.first().map(|v| v.meta);
            Ok(dashboard_report(
                &summary,
                &crops,
                &villages,
                visual,
                generated_at,
            ))
        })
        .await
    }
}
