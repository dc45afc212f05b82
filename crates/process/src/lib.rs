//! # GeoProcs Process
//!
//! Named, self-describing geospatial processes over the GeoProcs engines.
//!
//! Every process is a unit struct implementing [`Process`] with a typed
//! input, a typed output and a static [`ProcessInfo`] describing its
//! parameters. [`run`] validates the input, executes the engine and logs the
//! run; [`registry`] lists every process for discovery.
//!
//! ```no_run
//! use geoprocs_process::prelude::*;
//!
//! let dem = geoprocs_core::io::read_geotiff("dem.tif")?;
//! let slope = run(&Slope, SlopeInput::new(dem))?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod descriptor;
pub mod error;
pub mod extent;
pub mod process;
pub mod raster;
pub mod registry;
pub mod statistics;
pub mod vector;

mod validate;

pub use descriptor::{Category, ParamInfo, ParamKind, ProcessInfo};
pub use error::{ProcessError, Result};
pub use extent::expand_extent;
pub use process::{run, Process};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::descriptor::{Category, ParamInfo, ParamKind, ProcessInfo};
    pub use crate::error::{ProcessError, Result};
    pub use crate::process::{run, Process};
    pub use crate::raster::{
        Aspect, AspectInput, Curvature, CurvatureInput, FlowDirection, FlowDirectionInput, Hillshade,
        HillshadeInput, NeighborhoodInput, Slope, SlopeInput, Tpi, Tri,
    };
    pub use crate::registry;
    pub use crate::statistics::{
        NearestNeighbor, NearestNeighborInput, PearsonCorrelation, PearsonInput, QuadratAnalysis,
        QuadratInput,
    };
    pub use crate::vector::{
        CalculateArea, CalculateAreaInput, CalculateLength, CalculateLengthInput, Clip, ClipInput,
        DelaunayInput, DelaunayTriangulation, DeleteDuplicates, DeleteDuplicatesInput,
        DeleteDuplicatesOutput, Erase, EraseInput, Intersect, OverlayInput, SymDifference, Union,
    };
}
