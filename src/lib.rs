//! cfgimport
//!
//! Configurable import/export resolution and interface compatibility
//! checking. The work is split across the workspace crates; this package
//! re-exports them and hosts the `cfgimport` command-line tool.
//!
//! - [`model`]: declarations, libraries, the program store and namespaces
//! - [`resolver`]: environments and configured-directive resolution
//! - [`checker`]: structural compatibility between an interface library and
//!   each candidate
//!
//! ```no_run
//! use cfgimport::checker::{Phase, check_compatible};
//! use cfgimport::model::{LibraryBuilder, ParamList, Program, Type};
//! use cfgimport::resolver::{ConfiguredDirective, Environment, resolve};
//!
//! let directive = ConfiguredDirective::import("stub.dart")
//!     .when("dart.library.io", None, "io.dart");
//! let env = Environment::builder().host_library("dart", "io").build();
//! assert_eq!(resolve(&directive, &env), "io.dart");
//!
//! let int = Type::named("dart:core", "int");
//! let program = Program::new()
//!     .with_library(
//!         LibraryBuilder::new("stub.dart")
//!             .function("f", int.clone(), ParamList::new())
//!             .build(),
//!     )
//!     .with_library(LibraryBuilder::new("io.dart").function("f", int, ParamList::new()).build());
//! let stub = program.namespace("stub.dart").unwrap();
//! let io = program.namespace("io.dart").unwrap();
//! let report = check_compatible(&program, &stub, &io, Phase::Full);
//! assert!(report.is_compatible());
//! ```

pub use cfgimport_checker as checker;
pub use cfgimport_common as common;
pub use cfgimport_model as model;
pub use cfgimport_resolver as resolver;

pub mod cli;
pub mod tracing_config;
