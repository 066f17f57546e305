//! Line operations.
//!
//! Everything that touches a line's topology is delegated to
//! [`Line::add_section`]; this layer resolves identities, enforces name
//! uniqueness and persists the result.

use tracing::info;

use super::error::ServiceError;
use crate::domain::{Line, LineId, Section, Station, StationId, validate_name};
use crate::store::{Store, Tables};

/// A section to add, referring to stations by id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewSection {
    pub up_station: StationId,
    pub down_station: StationId,
    pub distance: i64,
}

/// A line to create, optionally with its first section.
#[derive(Debug, Clone)]
pub struct NewLine {
    pub name: String,
    pub color: String,
    pub section: Option<NewSection>,
}

/// Create, read, edit and delete lines, and extend their chains.
#[derive(Clone)]
pub struct LineService {
    store: Store,
}

impl LineService {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    /// Create a line. Names are unique across lines.
    pub async fn create_line(&self, request: NewLine) -> Result<Line, ServiceError> {
        let name = validate_name(&request.name)?;
        let line = self
            .store
            .transact(|tables| {
                ensure_name_free(tables, &name, None)?;
                let first = request
                    .section
                    .map(|s| resolve_stations(tables, &s))
                    .transpose()?;

                let id = tables.next_line_id();
                let mut line = Line::new(id, &name, &request.color)?;
                if let Some((up, down, distance)) = first {
                    line.add_section(Section::new(id, up, down, distance)?)?;
                }
                // The id is only reserved once the line is known to be valid
                tables.allocate_line_id();
                tables.insert_line(line.clone());
                Ok::<_, ServiceError>(line)
            })
            .await?;

        info!(id = %line.id(), name = line.name(), "created line");
        Ok(line)
    }

    /// All lines, ordered by id.
    pub async fn lines(&self) -> Vec<Line> {
        self.store
            .view(|tables| tables.lines().cloned().collect())
            .await
    }

    /// Look up one line.
    pub async fn line(&self, id: LineId) -> Result<Line, ServiceError> {
        self.store
            .view(|tables| tables.line(id).cloned())
            .await
            .ok_or(ServiceError::LineNotFound(id))
    }

    /// Replace a line's name and color.
    pub async fn update_line(
        &self,
        id: LineId,
        name: &str,
        color: &str,
    ) -> Result<Line, ServiceError> {
        let line = self
            .store
            .transact(|tables| {
                if tables.line(id).is_none() {
                    return Err(ServiceError::LineNotFound(id));
                }
                let name = validate_name(name)?;
                ensure_name_free(tables, &name, Some(id))?;

                let line = tables.line_mut(id).ok_or(ServiceError::LineNotFound(id))?;
                line.edit(&name, color)?;
                Ok(line.clone())
            })
            .await?;

        info!(%id, name = line.name(), "updated line");
        Ok(line)
    }

    /// Delete a line and its sections.
    pub async fn delete_line(&self, id: LineId) -> Result<(), ServiceError> {
        self.store
            .transact(|tables| {
                tables
                    .remove_line(id)
                    .map(|_| ())
                    .ok_or(ServiceError::LineNotFound(id))
            })
            .await?;

        info!(%id, "deleted line");
        Ok(())
    }

    /// Add a section to an existing line.
    pub async fn add_section(
        &self,
        id: LineId,
        request: NewSection,
    ) -> Result<Line, ServiceError> {
        let line = self
            .store
            .transact(|tables| {
                if tables.line(id).is_none() {
                    return Err(ServiceError::LineNotFound(id));
                }
                let (up, down, distance) = resolve_stations(tables, &request)?;
                let section = Section::new(id, up, down, distance)?;

                let line = tables.line_mut(id).ok_or(ServiceError::LineNotFound(id))?;
                line.add_section(section)?;
                Ok(line.clone())
            })
            .await?;

        info!(
            %id,
            up = %request.up_station,
            down = %request.down_station,
            distance = request.distance,
            "added section"
        );
        Ok(line)
    }
}

/// Fail if another line already uses `name`.
fn ensure_name_free(
    tables: &Tables,
    name: &str,
    except: Option<LineId>,
) -> Result<(), ServiceError> {
    let taken = tables
        .lines()
        .any(|line| line.name() == name && Some(line.id()) != except);
    if taken {
        return Err(ServiceError::DuplicateLineName(name.to_string()));
    }
    Ok(())
}

fn resolve_stations(
    tables: &Tables,
    request: &NewSection,
) -> Result<(Station, Station, i64), ServiceError> {
    let up = tables
        .station(request.up_station)
        .cloned()
        .ok_or(ServiceError::StationNotFound(request.up_station))?;
    let down = tables
        .station(request.down_station)
        .cloned()
        .ok_or(ServiceError::StationNotFound(request.down_station))?;
    Ok((up, down, request.distance))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::SectionError;
    use crate::service::StationService;
    use crate::store::Snapshot;
    use tempfile::tempdir;

    struct Fixture {
        stations: StationService,
        lines: LineService,
    }

    impl Fixture {
        fn new() -> Self {
            Self::with_store(Store::in_memory())
        }

        fn with_store(store: Store) -> Self {
            Self {
                stations: StationService::new(store.clone()),
                lines: LineService::new(store),
            }
        }

        async fn station(&self, name: &str) -> StationId {
            self.stations.create_station(name).await.unwrap().id()
        }
    }

    fn new_line(name: &str, up: StationId, down: StationId, distance: i64) -> NewLine {
        NewLine {
            name: name.to_string(),
            color: "bg-red-600".to_string(),
            section: Some(NewSection {
                up_station: up,
                down_station: down,
                distance,
            }),
        }
    }

    fn station_names(line: &Line) -> Vec<String> {
        line.stations().iter().map(|s| s.name().to_string()).collect()
    }

    #[tokio::test]
    async fn create_line_with_first_section() {
        let fx = Fixture::new();
        let gangnam = fx.station("Gangnam").await;
        let gwanggyo = fx.station("Gwanggyo").await;

        let line = fx
            .lines
            .create_line(new_line("Sinbundang", gangnam, gwanggyo, 10))
            .await
            .unwrap();

        assert_eq!(line.id(), LineId(1));
        assert_eq!(station_names(&line), ["Gangnam", "Gwanggyo"]);
        assert_eq!(fx.lines.line(line.id()).await.unwrap().name(), "Sinbundang");
    }

    #[tokio::test]
    async fn rejected_create_does_not_use_up_an_id() {
        let fx = Fixture::new();
        let gangnam = fx.station("Gangnam").await;
        let gwanggyo = fx.station("Gwanggyo").await;

        let err = fx
            .lines
            .create_line(new_line("Sinbundang", gangnam, gwanggyo, 0))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Section(_)));

        let line = fx
            .lines
            .create_line(new_line("Sinbundang", gangnam, gwanggyo, 10))
            .await
            .unwrap();
        assert_eq!(line.id(), LineId(1));
        assert_eq!(fx.lines.lines().await.len(), 1);
    }

    #[tokio::test]
    async fn create_line_without_stations() {
        let fx = Fixture::new();
        let line = fx
            .lines
            .create_line(NewLine {
                name: "Sinbundang".into(),
                color: "bg-red-600".into(),
                section: None,
            })
            .await
            .unwrap();
        assert!(line.stations().is_empty());
    }

    #[tokio::test]
    async fn create_line_with_duplicated_name() {
        let fx = Fixture::new();
        let gangnam = fx.station("Gangnam").await;
        let gwanggyo = fx.station("Gwanggyo").await;

        let request = new_line("Sinbundang", gangnam, gwanggyo, 10);
        fx.lines.create_line(request.clone()).await.unwrap();
        let err = fx.lines.create_line(request).await.unwrap_err();

        assert!(matches!(err, ServiceError::DuplicateLineName(_)));
        assert_eq!(fx.lines.lines().await.len(), 1);
    }

    #[tokio::test]
    async fn create_line_with_same_up_and_down_station() {
        let fx = Fixture::new();
        let gangnam = fx.station("Gangnam").await;

        let err = fx
            .lines
            .create_line(new_line("Sinbundang", gangnam, gangnam, 10))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            ServiceError::Section(SectionError::IllegalSection(_))
        ));
        assert!(fx.lines.lines().await.is_empty());
    }

    #[tokio::test]
    async fn create_line_with_unknown_station() {
        let fx = Fixture::new();
        let gangnam = fx.station("Gangnam").await;

        let err = fx
            .lines
            .create_line(new_line("Sinbundang", gangnam, StationId(99), 10))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::StationNotFound(StationId(99))));
    }

    #[tokio::test]
    async fn lines_lists_everything() {
        let fx = Fixture::new();
        let gangnam = fx.station("Gangnam").await;
        let gwanggyo = fx.station("Gwanggyo").await;
        fx.lines
            .create_line(new_line("Sinbundang", gangnam, gwanggyo, 10))
            .await
            .unwrap();
        fx.lines
            .create_line(new_line("Bundang", gangnam, gwanggyo, 10))
            .await
            .unwrap();

        let names: Vec<_> = fx
            .lines
            .lines()
            .await
            .iter()
            .map(|l| l.name().to_string())
            .collect();
        assert_eq!(names, ["Sinbundang", "Bundang"]);
    }

    #[tokio::test]
    async fn missing_line() {
        let fx = Fixture::new();
        assert!(fx.lines.line(LineId(0)).await.unwrap_err().is_not_found());
        assert!(
            fx.lines
                .update_line(LineId(0), "Ghost", "bg-grey-600")
                .await
                .unwrap_err()
                .is_not_found()
        );
        assert!(fx.lines.delete_line(LineId(0)).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn update_line() {
        let fx = Fixture::new();
        let gangnam = fx.station("Gangnam").await;
        let gwanggyo = fx.station("Gwanggyo").await;
        let line = fx
            .lines
            .create_line(new_line("Sinbundang", gangnam, gwanggyo, 10))
            .await
            .unwrap();

        let updated = fx
            .lines
            .update_line(line.id(), "Shinbundang", "bg-magenta-600")
            .await
            .unwrap();
        assert_eq!(updated.name(), "Shinbundang");
        assert_eq!(updated.color(), "bg-magenta-600");
        assert_eq!(station_names(&updated), ["Gangnam", "Gwanggyo"]);
    }

    #[tokio::test]
    async fn update_line_keeping_its_own_name() {
        let fx = Fixture::new();
        let line = fx
            .lines
            .create_line(NewLine {
                name: "Sinbundang".into(),
                color: "bg-red-600".into(),
                section: None,
            })
            .await
            .unwrap();

        let updated = fx
            .lines
            .update_line(line.id(), "Sinbundang", "bg-blue-600")
            .await
            .unwrap();
        assert_eq!(updated.color(), "bg-blue-600");
    }

    #[tokio::test]
    async fn update_line_to_taken_name() {
        let fx = Fixture::new();
        for name in ["Sinbundang", "Bundang"] {
            fx.lines
                .create_line(NewLine {
                    name: name.into(),
                    color: "bg-red-600".into(),
                    section: None,
                })
                .await
                .unwrap();
        }

        let err = fx
            .lines
            .update_line(LineId(2), "Sinbundang", "bg-red-600")
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::DuplicateLineName(_)));
        assert_eq!(fx.lines.line(LineId(2)).await.unwrap().name(), "Bundang");
    }

    #[tokio::test]
    async fn delete_line() {
        let fx = Fixture::new();
        let gangnam = fx.station("Gangnam").await;
        let gwanggyo = fx.station("Gwanggyo").await;
        let line = fx
            .lines
            .create_line(new_line("Sinbundang", gangnam, gwanggyo, 10))
            .await
            .unwrap();

        fx.lines.delete_line(line.id()).await.unwrap();
        assert!(fx.lines.lines().await.is_empty());
        // Stations are free again once the line is gone
        fx.stations.delete_station(gangnam).await.unwrap();
    }

    #[tokio::test]
    async fn add_sections_to_line() {
        let fx = Fixture::new();
        let gangnam = fx.station("Gangnam").await;
        let yangjae = fx.station("Yangjae").await;
        let pangyo = fx.station("Pangyo").await;
        let gwanggyo = fx.station("Gwanggyo").await;
        let line = fx
            .lines
            .create_line(new_line("Sinbundang", yangjae, pangyo, 10))
            .await
            .unwrap();

        let add = |up, down, distance| NewSection {
            up_station: up,
            down_station: down,
            distance,
        };
        fx.lines
            .add_section(line.id(), add(gangnam, yangjae, 5))
            .await
            .unwrap();
        let line = fx
            .lines
            .add_section(line.id(), add(pangyo, gwanggyo, 7))
            .await
            .unwrap();

        assert_eq!(
            station_names(&line),
            ["Gangnam", "Yangjae", "Pangyo", "Gwanggyo"]
        );
        assert_eq!(line.sections().total_distance(), 22);
    }

    #[tokio::test]
    async fn rejected_section_leaves_line_unchanged() {
        let fx = Fixture::new();
        let gangnam = fx.station("Gangnam").await;
        let yangjae = fx.station("Yangjae").await;
        let gwanggyo = fx.station("Gwanggyo").await;
        let line = fx
            .lines
            .create_line(new_line("Sinbundang", gangnam, gwanggyo, 10))
            .await
            .unwrap();

        let err = fx
            .lines
            .add_section(
                line.id(),
                NewSection {
                    up_station: gangnam,
                    down_station: yangjae,
                    distance: 10,
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ServiceError::Section(SectionError::IllegalSection(_))
        ));

        let err = fx
            .lines
            .add_section(
                line.id(),
                NewSection {
                    up_station: gangnam,
                    down_station: gwanggyo,
                    distance: 3,
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ServiceError::Section(SectionError::DuplicatedSection)
        ));

        let line = fx.lines.line(line.id()).await.unwrap();
        assert_eq!(station_names(&line), ["Gangnam", "Gwanggyo"]);
        assert_eq!(line.sections().total_distance(), 10);
    }

    #[tokio::test]
    async fn add_section_to_missing_line() {
        let fx = Fixture::new();
        let err = fx
            .lines
            .add_section(
                LineId(5),
                NewSection {
                    up_station: StationId(1),
                    down_station: StationId(2),
                    distance: 3,
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::LineNotFound(LineId(5))));
    }

    #[tokio::test]
    async fn lines_survive_restart() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("network.json");

        let fx = Fixture::with_store(Store::open(Snapshot::new(&path)).unwrap());
        let gangnam = fx.station("Gangnam").await;
        let pangyo = fx.station("Pangyo").await;
        let gwanggyo = fx.station("Gwanggyo").await;
        let line = fx
            .lines
            .create_line(new_line("Sinbundang", gangnam, gwanggyo, 10))
            .await
            .unwrap();
        fx.lines
            .add_section(
                line.id(),
                NewSection {
                    up_station: pangyo,
                    down_station: gwanggyo,
                    distance: 4,
                },
            )
            .await
            .unwrap();

        let restarted = Fixture::with_store(Store::open(Snapshot::new(&path)).unwrap());
        let line = restarted.lines.line(line.id()).await.unwrap();
        assert_eq!(station_names(&line), ["Gangnam", "Pangyo", "Gwanggyo"]);
        let distances: Vec<_> = line.sections().iter().map(|s| s.distance().get()).collect();
        assert_eq!(distances, [6, 4]);
    }
}
