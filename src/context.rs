//! Context graph computation entry point
//!
//! Collects raw metadata through the collaborators, builds the context graph
//! and renders it in the requested format.
//!
//! Two surfaces are offered:
//! - [`try_compute_graph`] returns the [`GraphError`] itself
//! - [`compute_graph`] renders any failure as [`Rendered::Error`]

use crate::error::{ErrorEnvelope, GraphResult};
use crate::graph::{OutputFormat, RenderOptions, Rendered};
use crate::metadata::{ContainerRuntime, Orchestrator};
use crate::topology::{BuildOptions, build_context_graph};

/// Options for a full compute request
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComputeOptions {
    pub build: BuildOptions,
    pub render: RenderOptions,
}

/// Build the context graph and render it, returning errors as [`GraphError`]
///
/// The format tag is checked before any metadata is fetched.
///
/// [`GraphError`]: crate::error::GraphError
pub fn try_compute_graph(
    orchestrator: &dyn Orchestrator,
    runtime: &dyn ContainerRuntime,
    output_format: &str,
    options: &ComputeOptions,
) -> GraphResult<Rendered> {
    let format: OutputFormat = output_format.parse()?;
    let graph = build_context_graph(orchestrator, runtime, &options.build)?;
    graph.dump_format(format, &options.render)
}

/// Build the context graph and render it
///
/// Any failure is logged and rendered as an [`ErrorEnvelope`]; check
/// [`Rendered::is_success`] to tell the two apart.
pub fn compute_graph(
    orchestrator: &dyn Orchestrator,
    runtime: &dyn ContainerRuntime,
    output_format: &str,
    options: &ComputeOptions,
) -> Rendered {
    try_compute_graph(orchestrator, runtime, output_format, options).unwrap_or_else(|err| {
        tracing::error!("Failed to compute context graph ({}): {}", err.kind(), err);
        Rendered::Error(ErrorEnvelope::from(err))
    })
}
