#[cfg(all(not(test), not(feature = "debug-checks")))]
pub const COBRA_ASSERT_LEVEL_DEFINITION: u8 = COBRA_ASSERT_SIMPLE;

#[cfg(any(test, feature = "debug-checks"))]
pub const COBRA_ASSERT_LEVEL_DEFINITION: u8 = COBRA_ASSERT_MODERATE;

pub const COBRA_ASSERT_SIMPLE: u8 = 1;
pub const COBRA_ASSERT_MODERATE: u8 = 2;
pub const COBRA_ASSERT_ADVANCED: u8 = 3;

#[macro_export]
#[doc(hidden)]
macro_rules! cobra_assert_simple {
    ($($arg:tt)*) => {
        if $crate::asserts::COBRA_ASSERT_LEVEL_DEFINITION >= $crate::asserts::COBRA_ASSERT_SIMPLE {
            assert!($($arg)*);
        }
    };
}

#[macro_export]
#[doc(hidden)]
macro_rules! cobra_assert_eq_simple {
    ($($arg:tt)*) => {
        if $crate::asserts::COBRA_ASSERT_LEVEL_DEFINITION >= $crate::asserts::COBRA_ASSERT_SIMPLE {
            assert_eq!($($arg)*);
        }
    };
}

#[macro_export]
#[doc(hidden)]
macro_rules! cobra_assert_moderate {
    ($($arg:tt)*) => {
        if $crate::asserts::COBRA_ASSERT_LEVEL_DEFINITION >= $crate::asserts::COBRA_ASSERT_MODERATE {
            assert!($($arg)*);
        }
    };
}

#[macro_export]
#[doc(hidden)]
macro_rules! cobra_assert_advanced {
    ($($arg:tt)*) => {
        if $crate::asserts::COBRA_ASSERT_LEVEL_DEFINITION >= $crate::asserts::COBRA_ASSERT_ADVANCED {
            assert!($($arg)*);
        }
    };
}
