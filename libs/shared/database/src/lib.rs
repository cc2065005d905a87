pub mod error;
pub mod supabase;
