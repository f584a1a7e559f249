#[derive(Clone)]
struct AppState {
    inner: Arc<Mutex<PerformanceApi>>,
}

impl AppState {
    fn new(api: PerformanceApi) -> Self {
        Self {
            inner: Arc::new(Mutex::new(api)),
        }
    }
}
