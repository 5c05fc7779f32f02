/// Process exit codes.
///
/// Not-found and refused actions are reported on stdout and still exit
/// with `SUCCESS`; only errors reaching `main` use `FAILURE`.
pub mod exit {
    pub const SUCCESS: i32 = 0;
    pub const FAILURE: i32 = 1;
}
