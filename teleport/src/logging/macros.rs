/// Emit a tracing event tagged with `scope`, if the scope's configured level allows it.
///
/// `$level` is one of the `tracing::Level` constants: `ERROR`, `WARN`, `INFO`, `DEBUG`, `TRACE`.
#[macro_export]
macro_rules! scoped_log {
    ($level:ident, $scope:expr, $($arg:tt)*) => {
        if $crate::logging::get_log_config().should_log($scope, $crate::logging::Level::$level) {
            $crate::logging::tracing::event!($crate::logging::Level::$level, scope = $scope, $($arg)*);
        }
    };
}

/// Aim session lifecycle: press, release, re-check cadence
#[macro_export]
macro_rules! aim_log {
    ($level:ident, $($arg:tt)*) => {
        $crate::scoped_log!($level, "aim", $($arg)*)
    };
}

#[macro_export]
macro_rules! collision_log {
    ($level:ident, $($arg:tt)*) => {
        $crate::scoped_log!($level, "collision", $($arg)*)
    };
}

#[macro_export]
macro_rules! relocation_log {
    ($level:ident, $($arg:tt)*) => {
        $crate::scoped_log!($level, "relocation", $($arg)*)
    };
}

#[macro_export]
macro_rules! input_log {
    ($level:ident, $($arg:tt)*) => {
        $crate::scoped_log!($level, "input", $($arg)*)
    };
}
