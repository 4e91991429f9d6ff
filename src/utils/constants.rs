/// URL del proyecto Supabase
/// Configurada en tiempo de compilación vía .env (ver build.rs)
pub const SUPABASE_URL: &str = match option_env!("SUPABASE_URL") {
    Some(url) => url,
    None => "http://localhost:54321",
};

/// Clave anónima del proyecto (publishable key)
pub const SUPABASE_ANON_KEY: &str = match option_env!("SUPABASE_ANON_KEY") {
    Some(key) => key,
    None => "dev-anon-key",
};

/// Bucket de imágenes de tareas
pub const TASK_IMAGES_BUCKET: &str = "task-images";

/// Clave localStorage de la sesión de auth
pub const SESSION_STORAGE_KEY: &str = "reise_check_session";

/// Prefijo de claves del espejo offline de escenarios activos
/// (clave completa: `activeScenarios_{user_id}`)
pub const ACTIVE_SCENARIOS_KEY_PREFIX: &str = "activeScenarios_";
