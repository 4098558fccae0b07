use clinica_core::model::{
    ApiResponse, BusquedaGlobal, ConfirmacionLectura, DashboardData, EstadoSistema, FiltroReporte,
    Notificaciones, PacienteCompleto, ReporteConsultas,
};
use serde_json::json;

use crate::error::Result;
use crate::http::{segment, HttpClient};

/// Aggregated views composed by the orchestrator backend.
#[derive(Debug, Clone)]
pub struct OrquestadorService {
    client: HttpClient,
}

impl OrquestadorService {
    pub fn new(client: HttpClient) -> Self {
        Self { client }
    }

    pub async fn dashboard(&self) -> Result<ApiResponse<DashboardData>> {
        self.client
            .get("/dashboard")
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Error fetching dashboard data"))
    }

    pub async fn paciente_completo(&self, paciente_id: &str) -> Result<ApiResponse<PacienteCompleto>> {
        let path = format!("/pacientes/{}/completo", segment(paciente_id));
        self.client
            .get(&path)
            .await
            .inspect_err(|e| tracing::error!(paciente_id, error = %e, "Error fetching complete patient"))
    }

    pub async fn buscar(&self, query: &str) -> Result<ApiResponse<BusquedaGlobal>> {
        self.client
            .get_with_query("/search", &[("q", query)])
            .await
            .inspect_err(|e| tracing::error!(query, error = %e, "Error in global search"))
    }

    pub async fn reporte_consultas(
        &self,
        start_date: &str,
        end_date: &str,
        filtro: &FiltroReporte,
    ) -> Result<ApiResponse<ReporteConsultas>> {
        let mut query = vec![("startDate", start_date), ("endDate", end_date)];
        if let Some(especialidad) = filtro.especialidad.as_deref() {
            query.push(("especialidad", especialidad));
        }
        if let Some(estado) = filtro.estado {
            query.push(("estado", estado.as_str()));
        }

        self.client
            .get_with_query("/reportes/consultas", &query)
            .await
            .inspect_err(|e| tracing::error!(start_date, end_date, error = %e, "Error fetching consultation report"))
    }

    pub async fn notificaciones(&self, usuario_id: &str) -> Result<ApiResponse<Notificaciones>> {
        let path = format!("/usuarios/{}/notificaciones", segment(usuario_id));
        self.client
            .get(&path)
            .await
            .inspect_err(|e| tracing::error!(usuario_id, error = %e, "Error fetching notifications"))
    }

    pub async fn marcar_leida(&self, notificacion_id: &str) -> Result<ApiResponse<ConfirmacionLectura>> {
        let path = format!("/notificaciones/{}/leer", segment(notificacion_id));
        self.client
            .patch(&path, &json!({}))
            .await
            .inspect_err(|e| tracing::error!(notificacion_id, error = %e, "Error marking notification read"))
    }

    pub async fn estado_sistema(&self) -> Result<ApiResponse<EstadoSistema>> {
        self.client
            .get("/system/health")
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Error fetching system health"))
    }
}
