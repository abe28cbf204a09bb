use eframe::egui;
use egui_plot::{Line, Plot, PlotPoints};

use nalgebra::SVector;

use ode_sim::models::Lorenz;
use ode_sim::sampler::{sample_collect, Sample, SampleGrid};
use ode_sim::solver::Dopri5;

fn main() -> eframe::Result {
    let y0 = SVector::<f64, 3>::new(1.0, 2.0, 1.0);
    let mut solver = Dopri5::new(Lorenz::default(), 0.0, y0)
        .expect("finite initial state");
    solver.set_tolerances(1e-6, 1e-8).expect("positive tolerances");

    let grid = SampleGrid::new(50.0, 5000);
    let trajectory = sample_collect(&mut solver, &grid).expect("integration failed");

    let app = TrajectoryViz { trajectory };
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([1200.0, 800.0]),
        ..Default::default()
    };
    eframe::run_native("Lorenz Trajectory", options, Box::new(|_| Ok(Box::new(app))))
}

struct TrajectoryViz {
    trajectory: Vec<Sample<3>>,
}

impl eframe::App for TrajectoryViz {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let step = (self.trajectory.len() / 2000).max(1);
        let sampled: Vec<&Sample<3>> = self.trajectory.iter().step_by(step).collect();

        egui::TopBottomPanel::top("header").show(ctx, |ui| {
            ui.heading("Lorenz system — sigma = 10, rho = 28, beta = 8/3");
            let t_end = self.trajectory.last().map_or(0.0, |s| s.t);
            ui.label(format!(
                "{} samples  |  t in [0, {t_end:.2}]  |  initial state (1, 2, 1)",
                self.trajectory.len(),
            ));
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            let available = ui.available_size();
            let half_w = available.x / 2.0 - 8.0;
            let half_h = available.y / 2.0 - 8.0;

            ui.horizontal(|ui| {
                // Attractor: x-z phase portrait
                ui.vertical(|ui| {
                    ui.label("Attractor (x vs z)");
                    let points: PlotPoints =
                        sampled.iter().map(|s| [s.y[0], s.y[2]]).collect();
                    Plot::new("attractor")
                        .width(half_w)
                        .height(half_h)
                        .x_axis_label("x")
                        .data_aspect(1.0)
                        .show(ui, |plot_ui| {
                            plot_ui.line(Line::new("x-z", points));
                        });
                });

                // x-y projection
                ui.vertical(|ui| {
                    ui.label("Projection (x vs y)");
                    let points: PlotPoints =
                        sampled.iter().map(|s| [s.y[0], s.y[1]]).collect();
                    Plot::new("projection")
                        .width(half_w)
                        .height(half_h)
                        .x_axis_label("x")
                        .show(ui, |plot_ui| {
                            plot_ui.line(Line::new("x-y", points));
                        });
                });
            });

            ui.horizontal(|ui| {
                // x(t)
                ui.vertical(|ui| {
                    ui.label("x(t)");
                    let points: PlotPoints =
                        sampled.iter().map(|s| [s.t, s.y[0]]).collect();
                    Plot::new("x_series")
                        .width(half_w)
                        .height(half_h)
                        .x_axis_label("Time")
                        .show(ui, |plot_ui| {
                            plot_ui.line(Line::new("x", points));
                        });
                });

                // z(t)
                ui.vertical(|ui| {
                    ui.label("z(t)");
                    let points: PlotPoints =
                        sampled.iter().map(|s| [s.t, s.y[2]]).collect();
                    Plot::new("z_series")
                        .width(half_w)
                        .height(half_h)
                        .x_axis_label("Time")
                        .show(ui, |plot_ui| {
                            plot_ui.line(Line::new("z", points));
                        });
                });
            });
        });
    }
}
