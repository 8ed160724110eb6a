use crate::{
    archive::{Packaged, WorkingDir, package_dir},
    config::Config,
    error::PipelineError,
    render::DocumentRenderer,
    report::StateReport,
    reshape::ReshapedRecord,
    util::format_date,
};
use anyhow::Context;
use std::path::{Path, PathBuf};
use time::Date;
use tracing::{debug, info};

/// Inputs the reporter needs besides the records and the run date.
#[derive(Debug, Clone)]
pub struct ReportSettings {
    pub states: Vec<String>,
    pub recent_days: usize,
    pub out_dir: PathBuf,
    pub name_prefix: String,
}

impl ReportSettings {
    pub fn from_config(cfg: &Config) -> Self {
        Self {
            states: cfg.report.states.clone(),
            recent_days: cfg.report.recent_days,
            out_dir: PathBuf::from(&cfg.output.out_dir),
            name_prefix: cfg.output.name_prefix.clone(),
        }
    }

    /// `{prefix}_{run_date}`, shared by the working directory and the archive.
    pub fn run_name(&self, run_date: Date) -> String {
        format!("{}_{}", self.name_prefix, format_date(run_date))
    }

    pub fn work_dir(&self, run_date: Date) -> PathBuf {
        self.out_dir.join(self.run_name(run_date))
    }

    pub fn archive_path(&self, run_date: Date) -> PathBuf {
        self.out_dir.join(format!("{}.zip", self.run_name(run_date)))
    }
}

impl Default for ReportSettings {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

/// The finished bundle of one run.
#[derive(Debug, Clone)]
pub struct ReportArchive {
    pub path: PathBuf,
    pub entries: Vec<String>,
    pub sha256: String,
}

pub struct Reporter<R: DocumentRenderer> {
    settings: ReportSettings,
    renderer: R,
}

impl<R: DocumentRenderer> Reporter<R> {
    pub fn new(settings: ReportSettings, renderer: R) -> Self {
        Self { settings, renderer }
    }

    /// Render one document per configured state into a scoped working
    /// directory, then zip them. The working directory is gone afterwards
    /// whether or not this succeeds.
    pub fn build_reports(
        &self,
        records: &[ReshapedRecord],
        run_date: Date,
    ) -> Result<ReportArchive, PipelineError> {
        // The working directory is the packager's resource; failing to set it
        // up is reported as an archive failure, not tied to any one state.
        let work = WorkingDir::acquire(self.settings.work_dir(run_date))
            .map_err(PipelineError::archive_failed)?;

        for state in &self.settings.states {
            self.write_state(records, state, run_date, work.path())?;
        }

        let dest = self.settings.archive_path(run_date);
        let packaged = package_dir(work.path(), &dest).map_err(PipelineError::archive_failed)?;

        if let Err(e) = work.close() {
            let _ = std::fs::remove_file(&dest);
            return Err(PipelineError::archive_failed(e));
        }

        let Packaged { entries, sha256 } = packaged;
        info!(
            "wrote {} ({} entries, sha256={})",
            dest.display(),
            entries.len(),
            sha256
        );

        Ok(ReportArchive {
            path: dest,
            entries,
            sha256,
        })
    }

    fn write_state(
        &self,
        records: &[ReshapedRecord],
        state: &str,
        run_date: Date,
        dir: &Path,
    ) -> Result<PathBuf, PipelineError> {
        let report = StateReport::select(records, state, run_date, self.settings.recent_days);
        debug!("state={} rows={}", state, report.rows.len());

        let bytes = self
            .renderer
            .render(&report)
            .map_err(|e| PipelineError::report_failed(state, e))?;

        let path = dir.join(format!(
            "{}_{}.{}",
            state,
            format_date(run_date),
            self.renderer.extension()
        ));
        std::fs::write(&path, bytes)
            .with_context(|| format!("write {}", path.display()))
            .map_err(|e| PipelineError::report_failed(state, e))?;
        Ok(path)
    }
}
