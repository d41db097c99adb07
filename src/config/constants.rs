pub mod compile_time {
    pub mod file_source {
        /// Maximum file size accepted for buffering (10MB)
        /// SECURITY: bounds memory committed per include frame
        pub const MAX_FILE_SIZE: u64 = 10 * 1024 * 1024;

        /// Threshold above which a file is logged as "large" (1MB)
        pub const LARGE_FILE_THRESHOLD: u64 = 1024 * 1024;
    }

    pub mod scanning {
        /// Maximum decoded string literal size (1MB)
        /// SECURITY: bounds accumulator growth per literal
        pub const MAX_STRING_SIZE: usize = 1_048_576;

        /// Maximum identifier length (255 bytes)
        pub const MAX_NAME_LENGTH: usize = 255;

        /// Maximum include path length accepted from a directive
        pub const MAX_INCLUDE_PATH_LENGTH: usize = 4096;
    }

    pub mod include {
        /// Maximum include stack depth (root frame counts as depth 1)
        /// SECURITY: bounds open handles and frame buffers even when
        /// cycle detection is defeated by symlink tricks
        pub const MAX_INCLUDE_DEPTH: usize = 10;

        /// Maximum admitted entries per @include_dir directive
        /// SECURITY: bounds the synthetic include fan-out of one directive
        pub const MAX_DIRECTORY_ENTRIES: usize = 4096;
    }

    pub mod logging {
        /// Maximum log message length
        pub const MAX_LOG_MESSAGE_LENGTH: usize = 10_000;

        /// Buffer size for the in-memory test logger
        pub const LOG_BUFFER_SIZE: usize = 10_000;
    }
}
