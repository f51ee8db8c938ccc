use maud::{html, Markup};

use crate::catalog::Catalog;
use crate::db::{StudyBlock, User};
use crate::progress::ProgressReport;
use crate::views;

pub struct ReportData<'a> {
    pub user: &'a User,
    pub report: &'a ProgressReport,
    pub blocks: &'a [StudyBlock],
    pub catalog: &'a Catalog,
}

fn kind_label(block: &StudyBlock) -> &'static str {
    use crate::planner::BlockKind;
    match block.kind {
        BlockKind::Study => "Estudo",
        BlockKind::Review => "Revisão",
        BlockKind::MockExam => "Simulado",
    }
}

fn overview(report: &ProgressReport) -> Markup {
    html! {
        h2 { "Resumo" }
        table {
            tbody {
                tr {
                    td { "Blocos planejados" }
                    td { strong { (report.planned) } }
                }
                tr {
                    td { "Blocos concluídos" }
                    td { strong { (report.completed) } }
                }
                tr {
                    td { "Adesão" }
                    td { strong { (format!("{:.1}%", report.adherence * 100.0)) } }
                }
                tr {
                    td { "Horas planejadas / concluídas" }
                    td { (format!("{:.1}h / {:.1}h", report.planned_hours, report.completed_hours)) }
                }
                tr {
                    td { "Estudo / Revisão / Simulado" }
                    td {
                        (report.by_kind.study) " / "
                        (report.by_kind.review) " / "
                        (report.by_kind.mock_exam)
                    }
                }
            }
        }
    }
}

fn disciplines(report: &ProgressReport) -> Markup {
    html! {
        h2 { "Por disciplina" }
        @if report.per_discipline.is_empty() {
            p { "Nenhum bloco planejado." }
        } @else {
            table {
                thead { tr {
                    th { "Disciplina" }
                    th { "Planejados" }
                    th { "Concluídos" }
                    th { "Horas" }
                } }
                tbody {
                    @for d in &report.per_discipline {
                        tr {
                            td { (d.name) }
                            td { (d.planned) }
                            td { (d.completed) }
                            td { (format!("{:.1}", d.planned_hours)) }
                        }
                    }
                }
            }
        }
    }
}

fn quiz(report: &ProgressReport, catalog: &Catalog) -> Markup {
    let quiz = &report.quiz;
    html! {
        h2 { "Questões" }
        p {
            (quiz.correct) " acertos em " (quiz.responded) " respostas ("
            (format!("{:.1}%", quiz.accuracy)) ")"
        }
        @if !quiz.per_discipline.is_empty() {
            table {
                thead { tr {
                    th { "Área" }
                    th { "Respostas" }
                    th { "Acertos" }
                    th { "Aproveitamento" }
                } }
                tbody {
                    @for score in &quiz.per_discipline {
                        tr {
                            td { (catalog.name_of(&score.discipline)) }
                            td { (score.responded) }
                            td { (score.correct) }
                            td { (format!("{:.1}%", score.accuracy)) }
                        }
                    }
                }
            }
        }
    }
}

fn schedule(blocks: &[StudyBlock]) -> Markup {
    html! {
        h2 { "Cronograma" }
        table {
            thead { tr {
                th { "Data" }
                th { "Horário" }
                th { "Tipo" }
                th { "Atividade" }
                th { "Concluído" }
            } }
            tbody {
                @for block in blocks {
                    tr {
                        td { (block.date.format("%d/%m/%Y")) }
                        td {
                            (block.start_time.format("%H:%M")) "–" (block.end_time.format("%H:%M"))
                        }
                        td { (kind_label(block)) }
                        td { (block.title) }
                        td { @if block.completed { "✓" } }
                    }
                }
            }
        }
    }
}

pub fn progress_report(data: ReportData<'_>) -> Markup {
    views::page(
        "Relatório de progresso",
        html! {
            p { "Aluno: " strong { (data.user.display_name) } }
            (overview(data.report))
            (disciplines(data.report))
            (quiz(data.report, data.catalog))
            @if !data.blocks.is_empty() {
                (schedule(data.blocks))
            }
        },
    )
}
