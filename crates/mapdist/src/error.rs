// We define a separate Error type within the public crate and just have it
// wrap the stringly errors from `mapdist_nostd_internal`. Over time, the
// internal errors should get migrated over to dedicated kinds.
//
// Errors fall into 3 groups:
// 1. configuration errors (geometry, shapes, cutoff) are detected before any
//    work gets dispatched
// 2. per-subproblem errors (non-finite values, panicking tasks) are reported
//    once the orchestrator receives the failed result
// 3. incomplete or malformed results, which indicate that the partition was
//    somehow inconsistent (some portion of the output would silently be zero)

#[derive(Debug)]
pub struct Error {
    kind: ErrorKind,
}

/// The underlying internal error type
#[non_exhaustive]
#[derive(Clone, Debug)]
enum ErrorKind {
    /// An error that occurs when the geometry of the grid or bins is invalid
    Geometry(GeometryError),
    /// An error that occurs when input arrays have inconsistent shapes
    Shape(ShapeError),
    /// An error that occurs when the cutoff distance is invalid
    Cutoff(CutoffError),
    /// An error that occurs when the cutoff distance isn't specified
    CutoffPresence(CutoffPresenceError),
    /// An error that occurs when a subproblem encounters a non-finite value
    NonFinite(NonFiniteError),
    /// An error that occurs when a task doesn't run to completion
    TaskFailed(TaskFailedError),
    /// An error that occurs when the assembled output doesn't account for
    /// every point exactly once
    Incomplete(IncompleteError),
    /// An error that occurs when an intermediate result contradicts the
    /// partition it was computed from
    Inconsistent(InconsistentError),
    /// An error that occurs while setting up an execution backend
    Backend(BackendError),
    /// An error that occurs within `mapdist_nostd_internal`
    ///
    /// The idea is to wrap the stringly errors that are returned throughout
    /// `mapdist_nostd_internal`.
    InternalLegacyAdHoc(InternalLegacyAdHocError),
}

// define constructor methods for Error
impl Error {
    /// produce an error describing invalid grid or bin geometry
    pub(crate) fn geometry(what: &'static str) -> Self {
        Error {
            kind: ErrorKind::Geometry(GeometryError(what)),
        }
    }

    /// produce an error indicating that `what` has `actual` entries when it
    /// should have `expected` entries
    pub(crate) fn shape(what: &'static str, expected: usize, actual: usize) -> Self {
        Error {
            kind: ErrorKind::Shape(ShapeError {
                what,
                expected,
                actual,
            }),
        }
    }

    /// produce an error describing an invalid cutoff
    pub(crate) fn cutoff(what: &'static str, value: f64) -> Self {
        Error {
            kind: ErrorKind::Cutoff(CutoffError { what, value }),
        }
    }

    /// produce an error indicating that the cutoff wasn't specified
    pub(crate) fn cutoff_presence() -> Self {
        Error {
            kind: ErrorKind::CutoffPresence(CutoffPresenceError),
        }
    }

    /// produce an error indicating that a subproblem encountered a
    /// non-finite value
    pub(crate) fn non_finite(
        subproblem: usize,
        point_index: usize,
        distance: f64,
        value: f64,
    ) -> Self {
        Error {
            kind: ErrorKind::NonFinite(NonFiniteError {
                subproblem,
                point_index,
                distance,
                value,
            }),
        }
    }

    /// produce an error indicating that a task failed to complete
    pub(crate) fn task_failed(task: usize, message: String) -> Self {
        Error {
            kind: ErrorKind::TaskFailed(TaskFailedError { task, message }),
        }
    }

    /// produce an error indicating that the output is missing contributions
    /// from (or has duplicate contributions from) some points
    pub(crate) fn incomplete(n_missing: usize, n_duplicated: usize) -> Self {
        Error {
            kind: ErrorKind::Incomplete(IncompleteError {
                n_missing,
                n_duplicated,
            }),
        }
    }

    /// produce an error indicating that the result of `subproblem` can't be
    /// written into the output
    pub(crate) fn malformed_result(subproblem: usize, what: &'static str) -> Self {
        Error {
            kind: ErrorKind::Inconsistent(InconsistentError {
                subproblem: Some(subproblem),
                what,
            }),
        }
    }

    /// produce an error indicating that work derived from the partition
    /// doesn't fit the grid
    pub(crate) fn inconsistent(what: &'static str) -> Self {
        Error {
            kind: ErrorKind::Inconsistent(InconsistentError {
                subproblem: None,
                what,
            }),
        }
    }

    /// produce an error indicating that an execution backend couldn't be
    /// set up
    pub(crate) fn backend(message: String) -> Self {
        Error {
            kind: ErrorKind::Backend(BackendError(message)),
        }
    }

    /// wraps a legacy internal error string
    pub(crate) fn internal_legacy_adhoc(message: &'static str) -> Self {
        Error {
            kind: ErrorKind::InternalLegacyAdHoc(InternalLegacyAdHocError(message)),
        }
    }

    /// whether the error was detected before any work was dispatched
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self.kind,
            ErrorKind::Geometry(_)
                | ErrorKind::Shape(_)
                | ErrorKind::Cutoff(_)
                | ErrorKind::CutoffPresence(_)
                | ErrorKind::InternalLegacyAdHoc(_)
        )
    }
}

impl std::error::Error for Error {}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        self.kind.fmt(f)
    }
}

impl std::error::Error for ErrorKind {}

impl core::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        match *self {
            ErrorKind::Geometry(ref err) => err.fmt(f),
            ErrorKind::Shape(ref err) => err.fmt(f),
            ErrorKind::Cutoff(ref err) => err.fmt(f),
            ErrorKind::CutoffPresence(ref err) => err.fmt(f),
            ErrorKind::NonFinite(ref err) => err.fmt(f),
            ErrorKind::TaskFailed(ref err) => err.fmt(f),
            ErrorKind::Incomplete(ref err) => err.fmt(f),
            ErrorKind::Inconsistent(ref err) => err.fmt(f),
            ErrorKind::Backend(ref err) => err.fmt(f),
            ErrorKind::InternalLegacyAdHoc(ref msg) => msg.fmt(f),
        }
    }
}

/// An error that occurs when the geometry of the grid or bins is invalid
#[derive(Clone, Debug)]
struct GeometryError(&'static str);

impl std::error::Error for GeometryError {}

impl core::fmt::Display for GeometryError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "invalid geometry: {}", self.0)
    }
}

/// An error that occurs when input arrays have inconsistent shapes
#[derive(Clone, Debug)]
struct ShapeError {
    what: &'static str,
    expected: usize,
    actual: usize,
}

impl std::error::Error for ShapeError {}

impl core::fmt::Display for ShapeError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        let ShapeError {
            what,
            expected,
            actual,
        } = self;
        write!(f, "{what} has a length of {actual}. It should be {expected}")
    }
}

/// An error that occurs when the cutoff distance is invalid
#[derive(Clone, Debug)]
struct CutoffError {
    what: &'static str,
    value: f64,
}

impl std::error::Error for CutoffError {}

impl core::fmt::Display for CutoffError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "invalid cutoff of {}: {}", self.value, self.what)
    }
}

/// An error that occurs when the cutoff distance isn't specified
#[derive(Clone, Debug)]
struct CutoffPresenceError;

impl std::error::Error for CutoffPresenceError {}

impl core::fmt::Display for CutoffPresenceError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "a cutoff distance was not specified")
    }
}

/// An error that occurs when a subproblem encounters a non-finite value
///
/// Either the distance itself isn't finite, or the mapping function produced
/// a non-finite value from it.
#[derive(Clone, Debug)]
struct NonFiniteError {
    subproblem: usize,
    point_index: usize,
    distance: f64,
    value: f64,
}

impl std::error::Error for NonFiniteError {}

impl core::fmt::Display for NonFiniteError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(
            f,
            "subproblem {} encountered a non-finite value for point {}: \
             distance = {}, mapped value = {}",
            self.subproblem, self.point_index, self.distance, self.value
        )
    }
}

/// An error that occurs when a task doesn't run to completion (e.g. it
/// panicked on a worker)
#[derive(Clone, Debug)]
struct TaskFailedError {
    task: usize,
    message: String,
}

impl std::error::Error for TaskFailedError {}

impl core::fmt::Display for TaskFailedError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "task {} failed: {}", self.task, self.message)
    }
}

/// An error that occurs when the assembled output doesn't account for every
/// point exactly once
#[derive(Clone, Debug)]
struct IncompleteError {
    n_missing: usize,
    n_duplicated: usize,
}

impl std::error::Error for IncompleteError {}

impl core::fmt::Display for IncompleteError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(
            f,
            "the assembled output is inconsistent: {} point(s) never received \
             a result and {} point(s) received more than one",
            self.n_missing, self.n_duplicated
        )
    }
}

/// An error that occurs when an intermediate result contradicts the
/// partition it was computed from
#[derive(Clone, Debug)]
struct InconsistentError {
    subproblem: Option<usize>,
    what: &'static str,
}

impl std::error::Error for InconsistentError {}

impl core::fmt::Display for InconsistentError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        match self.subproblem {
            Some(id) => write!(f, "the result of subproblem {id} is malformed: {}", self.what),
            None => write!(f, "inconsistent partition: {}", self.what),
        }
    }
}

/// An error that occurs while setting up an execution backend
#[derive(Clone, Debug)]
struct BackendError(String);

impl std::error::Error for BackendError {}

impl core::fmt::Display for BackendError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "unable to set up the execution backend: {}", self.0)
    }
}

/// wraps the string errors from `mapdist_nostd_internal`
#[derive(Clone)]
struct InternalLegacyAdHocError(&'static str);

impl std::error::Error for InternalLegacyAdHocError {}

impl core::fmt::Display for InternalLegacyAdHocError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

impl core::fmt::Debug for InternalLegacyAdHocError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        core::fmt::Debug::fmt(&self.0, f)
    }
}
