//! Built-in tool catalogue used when live discovery is unavailable.

use serde_json::json;

use crate::types::ToolSpec;

/// Name of the chart-producing tool; its results may carry chart payloads.
pub const CHART_TOOL_NAME: &str = "generate_sensor_chart";

/// The fixed fallback catalogue.
///
/// Mirrors the tools the sensor gateway normally advertises so that a turn
/// can still declare them to the model while the gateway is unreachable.
pub fn default_catalogue() -> Vec<ToolSpec> {
    vec![
        ToolSpec::new(
            "get_sensor_data",
            "반도체 공정 센서 데이터를 조회합니다. 센서 종류: temperature(온도), pressure(압력), vacuum(진공도), gas_flow(가스 유량), rf_power(RF Power)",
            json!({
                "type": "object",
                "properties": {
                    "sensor_type": {
                        "type": "string",
                        "description": "센서 종류 (temperature, pressure, vacuum, gas_flow, rf_power)",
                        "enum": ["temperature", "pressure", "vacuum", "gas_flow", "rf_power"]
                    },
                    "equipment_id": {
                        "type": "string",
                        "description": "장비 ID (선택)"
                    },
                    "start_time": {
                        "type": "string",
                        "description": "시작 시간 (ISO 8601 형식)"
                    },
                    "end_time": {
                        "type": "string",
                        "description": "종료 시간 (ISO 8601 형식)"
                    },
                    "limit": {
                        "type": "integer",
                        "description": "최대 반환 개수",
                        "default": 100
                    }
                },
                "required": ["sensor_type"]
            }),
        ),
        ToolSpec::new(
            CHART_TOOL_NAME,
            "센서 데이터를 시각화하는 ECharts 차트를 생성합니다.",
            json!({
                "type": "object",
                "properties": {
                    "sensor_type": {
                        "type": "string",
                        "description": "센서 종류",
                        "enum": ["temperature", "pressure", "vacuum", "gas_flow", "rf_power"]
                    },
                    "chart_type": {
                        "type": "string",
                        "description": "차트 유형",
                        "enum": ["line", "bar", "scatter", "gauge"],
                        "default": "line"
                    },
                    "equipment_id": {
                        "type": "string",
                        "description": "장비 ID (선택)"
                    },
                    "start_time": {
                        "type": "string",
                        "description": "시작 시간"
                    },
                    "end_time": {
                        "type": "string",
                        "description": "종료 시간"
                    },
                    "title": {
                        "type": "string",
                        "description": "차트 제목"
                    }
                },
                "required": ["sensor_type"]
            }),
        ),
        ToolSpec::new(
            "get_sensor_statistics",
            "센서 데이터의 통계 정보(평균, 최소, 최대, 표준편차)를 조회합니다.",
            json!({
                "type": "object",
                "properties": {
                    "sensor_type": {
                        "type": "string",
                        "description": "센서 종류",
                        "enum": ["temperature", "pressure", "vacuum", "gas_flow", "rf_power"]
                    },
                    "equipment_id": {
                        "type": "string",
                        "description": "장비 ID (선택)"
                    },
                    "period_hours": {
                        "type": "integer",
                        "description": "조회 기간 (시간)",
                        "default": 24
                    }
                },
                "required": ["sensor_type"]
            }),
        ),
        ToolSpec::new(
            "list_equipment",
            "등록된 장비 목록을 조회합니다.",
            json!({
                "type": "object",
                "properties": {}
            }),
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalogue_has_four_tools() {
        let tools = default_catalogue();
        let names: Vec<&str> = tools.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(
            names,
            [
                "get_sensor_data",
                "generate_sensor_chart",
                "get_sensor_statistics",
                "list_equipment"
            ]
        );
    }

    #[test]
    fn every_entry_declares_an_object_schema() {
        for tool in default_catalogue() {
            let schema = tool.input_schema.expect("catalogue schema");
            assert_eq!(schema["type"], "object");
        }
    }
}
