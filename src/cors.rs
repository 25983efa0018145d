use super::*;

pub const CORS_FILE: &str = ".env_cors";

/// Reads allowed origins, one per line. A missing file means same-origin only.
pub fn load_and_validate_cors_origins(path: &str) -> Result<Vec<String>, IOError> {
    let file = match File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            info!("{} not found, cross-origin requests are not allowed", path);
            return Ok(Vec::new());
        }
        Err(e) => return Err(e),
    };
    let buf_reader = BufReader::new(file);
    let mut origins = Vec::new();
    let mut all_lines_failed = true;
    let mut any_lines = false;

    for line in buf_reader.lines() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        any_lines = true;
        match line.parse::<Uri>() {
            Ok(uri) if uri.scheme().is_some() && uri.host().is_some() => {
                origins.push(line.trim_end_matches('/').to_string());
                all_lines_failed = false;
            }
            Ok(_) => warn!("CORS origin needs a scheme and host: {}", line),
            Err(e) => warn!("Invalid URI in CORS configuration: {}", e),
        }
    }

    if any_lines && all_lines_failed {
        return Err(IOError::new(
            ErrorKind::InvalidData,
            "All CORS lines failed validation.",
        ));
    }

    Ok(origins)
}

pub fn build_cors(origins: &[String]) -> Cors {
    let cors = Cors::default()
        .allowed_methods(vec!["GET", "POST", "OPTIONS"])
        .allowed_headers(vec![header::ACCEPT, header::CONTENT_TYPE])
        .max_age(3600);
    origins
        .iter()
        .fold(cors, |cors, origin| cors.allowed_origin(origin))
}
