/*!
Miscelanous items related to [logging](log).

Calls to the log macro are made throughout the library.
These are intended to provide useful information on the progress of a fit
and/or for fixing issues.

Note, no log implementation is provided.
For more details, see [log].
*/

/// Targets to be used within a [log]! macro.
pub mod targets {
    /// Logs related to [batch partitioning](crate::procedures::partition)
    pub const PARTITION: &str = "partition";

    /// Logs related to the [encoding builder](crate::builder)
    pub const ENCODING: &str = "encoding";

    /// Logs related to [solver invocation](crate::solvers)
    pub const SOLVER: &str = "solver";

    /// Logs related to [solution decoding](crate::procedures::decode)
    pub const DECODE: &str = "decode";

    /// Logs related to [literal pruning](crate::procedures::prune)
    pub const PRUNE: &str = "prune";

    /// Logs related to the [fit loop](crate::procedures::fit)
    pub const FIT: &str = "fit";
}
